//! 查询编译器
//!
//! 把若干变体与共享字段合并成有序的组合列表。
//!
//! 合并优先级（从低到高）：
//! 1. 先 add 的共享字段
//! 2. 后 add 的共享字段
//! 3. 变体自身的字段

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::QueryError;
use crate::models::record::{Combo, Record};

/// 查询构建器
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    variants: Vec<Record>,
    shared: Record,
}

/// 以给定顺序的变体创建查询构建器
pub fn make_query(variants: Vec<Record>) -> Result<QueryBuilder, QueryError> {
    if variants.is_empty() {
        return Err(QueryError::invalid("variants 不能为空"));
    }
    Ok(QueryBuilder {
        variants,
        shared: Record::new(),
    })
}

/// 从 JSON 值创建查询构建器，每个元素都必须是扁平标量对象
pub fn make_query_from_json(values: &[JsonValue]) -> Result<QueryBuilder, QueryError> {
    let variants = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Record::from_json(v).map_err(|e| QueryError::invalid(format!("variants[{}]: {}", i, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    make_query(variants)
}

/// 合并两条记录，`overlay` 中的字段覆盖 `base`
pub fn merge(base: &Record, overlay: &Record) -> Record {
    let mut merged = base.clone();
    merged.extend_from(overlay);
    merged
}

impl QueryBuilder {
    /// 追加一组共享字段，与之前 add 的字段合并（后者覆盖前者）
    pub fn add(mut self, shared: Record) -> Self {
        self.shared.extend_from(&shared);
        self
    }

    /// 编译出最终的组合列表，顺序与变体一致
    ///
    /// 每个组合先保留变体自身的字段顺序，再追加变体中没有的共享字段
    pub fn compile(&self) -> Result<Vec<Combo>, QueryError> {
        if self.variants.is_empty() {
            return Err(QueryError::invalid("没有可编译的变体"));
        }

        let combos: Vec<Combo> = self
            .variants
            .iter()
            .map(|variant| {
                let mut combo = variant.clone();
                combo.fill_missing(&self.shared);
                combo
            })
            .collect();

        debug!(
            "查询编译完成: {} 个组合, 共享字段 {} 个",
            combos.len(),
            self.shared.len()
        );

        Ok(combos)
    }
}
