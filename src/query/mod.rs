//! 查询层
//!
//! 只负责"把配置片段合并成组合"，不涉及任何网络请求

pub mod compiler;

pub use compiler::{make_query, make_query_from_json, merge, QueryBuilder};
