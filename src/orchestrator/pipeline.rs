//! 完整求解流程 - 编排层
//!
//! 加载场景 → 编译查询 → 导出组合 → 拉取模型 → 分批求解 → 导出结果
//!
//! 每一步都由调用方显式触发，不会因为上游变化自动重跑。

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::clients::OrientClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{filter_solved, load_scenario_or_builtin, Combo, SolveResult};
use crate::orchestrator::batch_dispatcher::{BatchDispatcher, DispatchOptions};
use crate::services::{DebugBundle, Exporter, Solver};
use crate::utils::logging::{
    init_log_file, log_combos_compiled, log_dispatch_summary, log_startup, one_line_preview,
};

/// 一次运行的产物
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub scenario: String,
    pub combos: Vec<Combo>,
    /// 与 `combos` 等长，失败位置为 `None`
    pub results: Vec<SolveResult>,
    pub succeeded: usize,
    pub failed: usize,
    pub model: Option<String>,
}

/// 应用主结构
pub struct App {
    config: Config,
    solver: Arc<dyn Solver>,
    client: Option<OrientClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .map_err(|e| AppError::file_write_failed(config.output_log_file.clone(), e))?;

        log_startup(
            &config.orient_server_url,
            config.chunk_size,
            config.request_timeout_secs,
        );

        let client = OrientClient::new(&config)?;

        Ok(Self {
            config,
            solver: Arc::new(client.clone()),
            client: Some(client),
        })
    }

    /// 使用自定义求解器（不拉取模型文件）
    pub fn with_solver(config: Config, solver: Arc<dyn Solver>) -> Self {
        Self {
            config,
            solver,
            client: None,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        let scenario = load_scenario_or_builtin(self.config.scenario_file.as_deref()).await?;
        let combos = scenario.to_query()?.compile()?;

        log_combos_compiled(&scenario.name, combos.len(), self.config.chunk_size);

        let exporter = Exporter::new(&self.config.output_dir);
        let combos_path = exporter.write_combos(&self.config.combos_file, &combos).await?;
        info!("💾 查询已导出: {}", combos_path.display());

        let model = self.fetch_model().await;

        let dispatcher = BatchDispatcher::new(
            Arc::clone(&self.solver),
            DispatchOptions::from_config(&self.config),
        );
        let started = Instant::now();
        let report = dispatcher
            .solve_many_report(&combos, self.config.chunk_size)
            .await?;
        log_dispatch_summary(&report, started.elapsed(), &self.config.output_log_file);
        let results = report.results;

        let results_path = exporter.write_results(&self.config.results_file, &results).await?;
        info!("💾 结果已导出: {}", results_path.display());

        let bundle = DebugBundle {
            model: model.as_deref(),
            combos: &combos,
            results: &results,
        };
        exporter.write_debug_bundle(&self.config.debug_file, &bundle).await?;

        let summary = RunSummary {
            scenario: scenario.name,
            combos,
            results,
            succeeded: report.succeeded,
            failed: report.failed,
            model,
        };

        self.log_first_solution(&summary);

        Ok(summary)
    }

    /// 拉取模型文件，失败不影响求解
    async fn fetch_model(&self) -> Option<String> {
        let client = self.client.as_ref()?;
        match client.fetch_model(&self.config.model_url).await {
            Ok(text) => {
                info!("📄 模型文件: {}", one_line_preview(&text, 60));
                Some(text)
            }
            Err(e) => {
                warn!("⚠️ 拉取模型文件失败: {:#}", e);
                None
            }
        }
    }

    fn log_first_solution(&self, summary: &RunSummary) {
        match filter_solved(&summary.results).first() {
            Some(solution) => info!(
                "🔎 首个成功结果: {}",
                one_line_preview(&solution.as_json().to_string(), 200)
            ),
            None => warn!("⚠️ 没有任何组合求解成功"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DispatchError, FileError, SolveError, TransportError};
    use crate::models::Solution;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedSolver {
        reachable: bool,
    }

    #[async_trait]
    impl Solver for FixedSolver {
        async fn check_ready(&self) -> Result<(), TransportError> {
            if self.reachable {
                Ok(())
            } else {
                Err(TransportError::unreachable(
                    "fixed",
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
                ))
            }
        }

        async fn solve(&self, _combo: &Combo) -> Result<Solution, SolveError> {
            Ok(Solution::new(json!({"rig_cost": 1})))
        }
    }

    fn config_in(dir_name: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("orient_batch_{}_{}", std::process::id(), dir_name));
        Config {
            output_dir: dir.display().to_string(),
            ..Default::default()
        }
    }

    fn app(config: Config, reachable: bool) -> App {
        App::with_solver(config, Arc::new(FixedSolver { reachable }))
    }

    #[tokio::test]
    async fn test_missing_scenario_file_surfaces_as_file_error() {
        let config = Config {
            scenario_file: Some("/definitely/not/here.toml".to_string()),
            ..config_in("missing_scenario")
        };
        let result = app(config, true).run().await;
        assert!(matches!(result, Err(AppError::File(FileError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_nested_scenario_record_surfaces_as_query_error() {
        let path = std::env::temp_dir().join(format!("orient_batch_{}_nested_run.toml", std::process::id()));
        std::fs::write(&path, "[[variants]]\nx = 1\n[variants.inner]\ny = 2\n").unwrap();
        let config = Config {
            scenario_file: Some(path.display().to_string()),
            ..config_in("nested_scenario")
        };

        let result = app(config, true).run().await;
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Query(_))));
    }

    #[tokio::test]
    async fn test_unreachable_solver_surfaces_as_dispatch_error() {
        let config = config_in("unreachable_run");
        let output_dir = config.output_dir.clone();

        let result = app(config, false).run().await;
        std::fs::remove_dir_all(&output_dir).ok();

        assert!(matches!(
            result,
            Err(AppError::Dispatch(DispatchError::Transport(TransportError::Unreachable { .. })))
        ));
    }

    #[tokio::test]
    async fn test_summary_counts_come_from_dispatch() {
        let config = config_in("counts_run");
        let output_dir = config.output_dir.clone();

        let summary = app(config, true).run().await.unwrap();
        std::fs::remove_dir_all(&output_dir).ok();

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 0);
        assert!(summary.model.is_none());
    }
}
