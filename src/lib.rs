//! # Orient Batch
//!
//! 为 Orient（Ubercalc）求解服务编译参数查询并分批提交求解，
//! 用于对比 NSE / SDR 两种证明构造方案的硬件成本、吞吐、证明大小等指标。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 扁平配置记录、求解结果、场景定义与加载
//!
//! ### ② 查询层（Query）
//! - `query/` - `make_query(variants).add(shared).compile()`，变体字段优先
//!
//! ### ③ 能力层（Services / Clients）
//! - `Solver` - 单个组合的求解能力
//! - `OrientClient` - 基于 reqwest 的 HTTP 实现
//! - `Exporter` - 导出 JSON
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_dispatcher` - 分批并发、超时、失败隔离、按下标回填
//! - `orchestrator/pipeline` - 完整流程
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod query;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::OrientClient;
pub use config::Config;
pub use error::{AppError, AppResult, DispatchError, QueryError, SolveError, TransportError};
pub use models::{filter_solved, Combo, Record, Scalar, Scenario, Solution, SolveResult};
pub use orchestrator::{App, BatchDispatcher, DispatchOptions, RunSummary};
pub use query::{make_query, merge, QueryBuilder};
pub use services::Solver;
