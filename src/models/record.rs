//! 配置记录
//!
//! 变体、共享字段和合并后的组合都是同一种扁平的 键 → 标量 映射。
//! 字段按写入顺序保存，导出时保持原样。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::QueryError;

/// 记录中的单个标量值
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Bool(b) => Some(Scalar::Bool(*b)),
            JsonValue::Number(n) => n.as_f64().map(Scalar::Number),
            JsonValue::String(s) => Some(Scalar::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<Scalar> for JsonValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Bool(b) => JsonValue::Bool(b),
            // 整数值按整数保存，与手写的查询保持一致
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => JsonValue::from(n as i64),
            Scalar::Number(n) => Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number),
            Scalar::Text(s) => JsonValue::String(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// 扁平配置记录（VariantRecord / SharedFields / Combo）
///
/// 字段集合完全由调用方决定，这里只保证每个值都是标量。
/// 底层是 `serde_json::Map`（开启 `preserve_order`），字段保持写入顺序，
/// 比较相等时不看顺序。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, JsonValue>);

/// 合并后的、可直接提交给求解器的配置
pub type Combo = Record;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式插入字段
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(key, value);
        self
    }

    /// 插入字段，已存在的键保持原来的位置
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.0.insert(key.into(), JsonValue::from(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<Scalar> {
        self.0.get(key).and_then(Scalar::from_json)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按写入顺序遍历字段名
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, Scalar)> + '_ {
        self.0
            .iter()
            .filter_map(|(k, v)| Scalar::from_json(v).map(|s| (k, s)))
    }

    /// 标签字段（以 `!` 开头且为 true 的布尔字段），例如 `!NSE`
    pub fn tags(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, v)| k.starts_with('!') && v.as_bool() == Some(true))
            .map(|(k, _)| &k[1..])
            .collect()
    }

    /// 从 JSON 对象构建记录
    ///
    /// 只接受扁平对象，字段值必须是数字、布尔或字符串
    pub fn from_json(value: &JsonValue) -> Result<Self, QueryError> {
        let object = value
            .as_object()
            .ok_or_else(|| QueryError::invalid(format!("记录必须是对象，实际为: {}", value)))?;

        let mut record = Record::new();
        for (key, field) in object {
            let scalar = Scalar::from_json(field).ok_or_else(|| {
                QueryError::invalid(format!("字段 {} 不是标量值: {}", key, field))
            })?;
            record.insert(key.clone(), scalar);
        }
        Ok(record)
    }

    /// 用 `other` 的字段覆盖当前记录
    pub(crate) fn extend_from(&mut self, other: &Record) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// 只补充当前记录中没有的字段，追加在末尾
    pub(crate) fn fill_missing(&mut self, other: &Record) {
        for (k, v) in &other.0 {
            if !self.0.contains_key(k) {
                self.0.insert(k.clone(), v.clone());
            }
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Record::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
