//! 求解结果
//!
//! 成功时是求解服务返回的不透明 JSON，失败位置用 `None` 占位

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 求解服务返回的结果（内容对本程序不透明）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution(pub JsonValue);

/// 单个组合的求解结果，`None` 表示该组合求解失败
pub type SolveResult = Option<Solution>;

impl Solution {
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// 读取结果中的某个字段
    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

/// 过滤掉失败的占位，保持原有顺序
pub fn filter_solved(results: &[SolveResult]) -> Vec<Solution> {
    results.iter().flatten().cloned().collect()
}
