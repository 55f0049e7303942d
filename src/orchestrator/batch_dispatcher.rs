//! 批量求解分发器 - 编排层
//!
//! ## 职责
//!
//! 把编译好的组合分批提交给求解服务，返回与输入等长、按下标对应的结果。
//!
//! ## 核心功能
//!
//! 1. **连通性检查**：第一批开始前确认服务可达，不可达或超时都整体失败
//! 2. **分批处理**：每批最多 `concurrency` 个请求并发，整批完成后才开始下一批
//! 3. **超时控制**：单个请求超时视为失败，不会卡住整批
//! 4. **失败隔离**：单个组合失败只会得到 `None`，不中断、不重试、不向上抛出
//! 5. **顺序稳定**：按原始下标回填结果，与完成先后无关
//!
//! ## 状态流转（每个组合）
//!
//! ```text
//! Pending → InFlight → Succeeded
//!                    ↘ Failed (→ None)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{DispatchError, SolveError, TransportError};
use crate::models::{Combo, Solution, SolveResult};
use crate::services::Solver;
use crate::utils::logging::{log_batch_start, log_chunk_done};

/// 分发参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// 默认每批请求数
    pub chunk_size: usize,
    /// 单个请求的超时时间
    pub request_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: 4,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl DispatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunk_size.max(1),
            request_timeout: config.request_timeout(),
        }
    }
}

/// 单个组合的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

/// 一次分发的完整结果
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// 与输入等长，失败位置为 `None`
    pub results: Vec<SolveResult>,
    /// 每个组合的最终状态
    pub states: Vec<SlotState>,
    pub succeeded: usize,
    pub failed: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct ChunkResult {
    success: usize,
    failed: usize,
}

/// 批量求解分发器
pub struct BatchDispatcher {
    solver: Arc<dyn Solver>,
    options: DispatchOptions,
}

impl BatchDispatcher {
    pub fn new(solver: Arc<dyn Solver>, options: DispatchOptions) -> Self {
        Self { solver, options }
    }

    /// 使用默认批大小求解
    pub async fn solve_all(&self, combos: &[Combo]) -> Result<Vec<SolveResult>, DispatchError> {
        self.solve_many(combos, self.options.chunk_size).await
    }

    /// 以每批 `concurrency` 个的方式求解所有组合
    pub async fn solve_many(
        &self,
        combos: &[Combo],
        concurrency: usize,
    ) -> Result<Vec<SolveResult>, DispatchError> {
        Ok(self.solve_many_report(combos, concurrency).await?.results)
    }

    /// 同 [`solve_many`](Self::solve_many)，额外返回每个组合的状态和统计
    pub async fn solve_many_report(
        &self,
        combos: &[Combo],
        concurrency: usize,
    ) -> Result<DispatchReport, DispatchError> {
        if concurrency == 0 {
            return Err(DispatchError::InvalidConcurrency);
        }

        let total = combos.len();
        let mut report = DispatchReport {
            results: Vec::with_capacity(total),
            states: vec![SlotState::Pending; total],
            succeeded: 0,
            failed: 0,
        };

        if total == 0 {
            return Ok(report);
        }

        self.ensure_ready().await?;

        let total_chunks = (total + concurrency - 1) / concurrency;

        for (chunk_idx, chunk) in combos.chunks(concurrency).enumerate() {
            let chunk_start = chunk_idx * concurrency;
            let chunk_num = chunk_idx + 1;

            log_batch_start(chunk_num, total_chunks, chunk_start + 1, chunk_start + chunk.len(), total);

            let started = Instant::now();
            let states = &mut report.states[chunk_start..chunk_start + chunk.len()];
            let (results, chunk_result) = self.solve_chunk(chunk, chunk_start, states).await;

            report.results.extend(results);
            report.succeeded += chunk_result.success;
            report.failed += chunk_result.failed;

            log_chunk_done(chunk_num, chunk_result.success, chunk_result.failed, started.elapsed());
        }

        debug_assert_eq!(report.results.len(), total);
        Ok(report)
    }

    /// 连通性检查同样受单次请求时限约束
    async fn ensure_ready(&self) -> Result<(), TransportError> {
        let request_timeout = self.options.request_timeout;
        match timeout(request_timeout, self.solver.check_ready()).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                endpoint: self.solver.endpoint(),
                timeout: request_timeout,
            }),
        }
    }

    /// 处理单个批次，等待本批全部结束后返回
    async fn solve_chunk(
        &self,
        chunk: &[Combo],
        chunk_start: usize,
        states: &mut [SlotState],
    ) -> (Vec<SolveResult>, ChunkResult) {
        let request_timeout = self.options.request_timeout;

        // 为本批创建并发任务
        let handles: Vec<_> = chunk
            .iter()
            .map(|combo| {
                let solver = Arc::clone(&self.solver);
                let combo = combo.clone();
                tokio::spawn(async move {
                    match timeout(request_timeout, solver.solve(&combo)).await {
                        Ok(result) => result,
                        Err(_) => Err(SolveError::Timeout(request_timeout)),
                    }
                })
            })
            .collect();

        for state in states.iter_mut() {
            *state = SlotState::InFlight;
        }

        // join_all 按提交顺序返回，与完成先后无关
        let outcomes = join_all(handles).await;

        let mut chunk_result = ChunkResult::default();
        let results: Vec<SolveResult> = outcomes
            .into_iter()
            .enumerate()
            .map(|(offset, outcome)| {
                let index = chunk_start + offset;
                let outcome: Result<Solution, SolveError> = match outcome {
                    Ok(inner) => inner,
                    Err(e) => Err(SolveError::TaskPanicked(e.to_string())),
                };

                match outcome {
                    Ok(solution) => {
                        debug!("[组合 {}] ✓ 求解成功", index + 1);
                        states[offset] = SlotState::Succeeded;
                        chunk_result.success += 1;
                        Some(solution)
                    }
                    Err(e) => {
                        warn!("[组合 {}] ❌ 求解失败: {}", index + 1, e);
                        states[offset] = SlotState::Failed;
                        chunk_result.failed += 1;
                        None
                    }
                }
            })
            .collect();

        (results, chunk_result)
    }
}
