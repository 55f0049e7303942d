//! 求解能力 - 业务能力层
//!
//! 只描述"能对单个组合求解"，不关心分批和并发

use async_trait::async_trait;

use crate::error::{SolveError, TransportError};
use crate::models::{Combo, Solution};

/// 求解服务
///
/// 职责：
/// - 对单个组合发起一次求解
/// - 在整批开始前确认服务可达
/// - 不重试，不处理超时（由分发器负责）
#[async_trait]
pub trait Solver: Send + Sync {
    /// 用于日志和错误信息的服务地址
    fn endpoint(&self) -> String {
        "solver".to_string()
    }

    /// 确认求解服务可达
    async fn check_ready(&self) -> Result<(), TransportError>;

    /// 求解单个组合
    async fn solve(&self, combo: &Combo) -> Result<Solution, SolveError>;
}
