//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_dispatcher` - 批量求解分发器
//! - 分批提交组合（每批最多 concurrency 个）
//! - 单个请求超时与失败隔离
//! - 按原始下标回填结果
//!
//! ### `pipeline` - 完整流程
//! - 加载场景 → 编译查询 → 导出组合
//! - 拉取模型 → 分批求解 → 导出结果
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! pipeline (App)
//!     ↓
//! query::QueryBuilder (组合编译)   batch_dispatcher (Vec<Combo> → Vec<Option<Solution>>)
//!                                      ↓
//!                                  services::Solver (单个组合求解)
//!                                      ↓
//!                                  clients::OrientClient (HTTP)
//! ```

pub mod batch_dispatcher;
pub mod pipeline;

// 重新导出主要类型
pub use batch_dispatcher::{BatchDispatcher, DispatchOptions, DispatchReport, SlotState};
pub use pipeline::{App, RunSummary};
