//! 导出服务 - 业务能力层
//!
//! 只负责"把组合和结果写成 JSON 文件"，不做任何转换

use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{filter_solved, Combo, SolveResult};

/// 调试器需要的完整数据
///
/// `results` 保留失败的占位，保证与 `combos` 按下标对应
#[derive(Debug, Serialize)]
pub struct DebugBundle<'a> {
    pub model: Option<&'a str>,
    pub combos: &'a [Combo],
    pub results: &'a [SolveResult],
}

/// 导出服务
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 导出编译后的组合
    pub async fn write_combos(&self, file_name: &str, combos: &[Combo]) -> AppResult<PathBuf> {
        self.write_json(file_name, &combos).await
    }

    /// 导出过滤掉失败占位后的结果
    pub async fn write_results(&self, file_name: &str, results: &[SolveResult]) -> AppResult<PathBuf> {
        let solved = filter_solved(results);
        self.write_json(file_name, &solved).await
    }

    /// 导出调试数据
    pub async fn write_debug_bundle(&self, file_name: &str, bundle: &DebugBundle<'_>) -> AppResult<PathBuf> {
        self.write_json(file_name, bundle).await
    }

    async fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_dir.display().to_string(), e))?;

        let path = self.output_dir.join(file_name);
        let json = serde_json::to_string_pretty(value)?;

        fs::write(&path, json)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        debug!("已写入: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, Solution};
    use serde_json::{json, Value};

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("orient_batch_export_{}_{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_results_export_drops_failed_slots() {
        let dir = temp_dir("results");
        let exporter = Exporter::new(&dir);
        let results = vec![Some(Solution::new(json!({"i": 0}))), None, Some(Solution::new(json!({"i": 2})))];

        let path = exporter.write_results("nse-results.json", &results).await.unwrap();
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(written, json!([{"i": 0}, {"i": 2}]));
    }

    #[tokio::test]
    async fn test_debug_bundle_keeps_positions() {
        let dir = temp_dir("debug");
        let exporter = Exporter::new(&dir);
        let combos = vec![Record::new().with("x", 1), Record::new().with("x", 2)];
        let results = vec![None, Some(Solution::new(json!({"ok": true})))];
        let bundle = DebugBundle {
            model: Some("model text"),
            combos: &combos,
            results: &results,
        };

        let path = exporter.write_debug_bundle("nse-debug.json", &bundle).await.unwrap();
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(written["model"], json!("model text"));
        assert_eq!(written["combos"], json!([{"x": 1}, {"x": 2}]));
        assert_eq!(written["results"], json!([null, {"ok": true}]));
    }

    #[tokio::test]
    async fn test_combos_export_is_verbatim() {
        let dir = temp_dir("combos");
        let exporter = Exporter::new(&dir);
        let combos = vec![Record::new().with("!NSE", true).with("delta", 0.05)];

        let path = exporter.write_combos("nse.json", &combos).await.unwrap();
        let written: Vec<Record> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(written, combos);
    }
}
