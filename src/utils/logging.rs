/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use std::io;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::orchestrator::DispatchReport;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化日志文件，写入本次运行的标题
pub fn init_log_file(log_file_path: &str) -> io::Result<()> {
    let log_header = format!(
        "{}\n求解批次日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
}

/// 记录程序启动信息
pub fn log_startup(server: &str, chunk_size: usize, timeout_secs: u64) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 分批求解模式");
    info!("🌐 求解服务: {}", server);
    info!("📊 每批请求数: {} | 单次超时: {}s", chunk_size, timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录查询编译结果
///
/// # 参数
/// - `scenario`: 场景名称
/// - `total`: 组合总数
/// - `chunk_size`: 每批请求数
pub fn log_combos_compiled(scenario: &str, total: usize, chunk_size: usize) {
    info!("✓ 场景 {} 编译出 {} 个组合", scenario, total);
    info!("📋 将以每批 {} 个的方式提交", chunk_size);
    info!("💡 每批完成后再开始下一批\n");
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始组合编号
/// - `end`: 结束组合编号
/// - `total`: 组合总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批组合: {}-{} / 共 {} 个", start, end, total);
}

/// 记录一批的成败和耗时，耗时由最慢的请求决定
pub fn log_chunk_done(chunk_num: usize, succeeded: usize, failed: usize, elapsed: Duration) {
    if failed == 0 {
        info!("✓ 第 {} 批全部成功 ({} 个, {:.2}s)", chunk_num, succeeded, elapsed.as_secs_f64());
    } else {
        info!(
            "⚠️ 第 {} 批: 成功 {} / 失败 {} ({:.2}s)",
            chunk_num,
            succeeded,
            failed,
            elapsed.as_secs_f64()
        );
    }
}

/// 成功率（百分比），空批次视为 0
pub fn success_rate(report: &DispatchReport) -> f64 {
    let total = report.results.len();
    if total == 0 {
        0.0
    } else {
        report.succeeded as f64 * 100.0 / total as f64
    }
}

/// 根据分发报告输出整次运行的统计
pub fn log_dispatch_summary(report: &DispatchReport, elapsed: Duration, log_file_path: &str) {
    info!("{}", "=".repeat(60));
    info!(
        "📊 求解结束 {} | 耗时 {:.1}s",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        elapsed.as_secs_f64()
    );
    info!(
        "✅ 成功 {} / ❌ 失败 {} / 共 {} ({:.1}%)",
        report.succeeded,
        report.failed,
        report.results.len(),
        success_rate(report)
    );
    info!("📝 日志文件: {}", log_file_path);
}

/// 把多行文本压成一行用于日志预览，超过 `max_chars` 时标出原始长度
pub fn one_line_preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let count = flat.chars().count();
    if count <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars).collect();
    format!("{}… (共 {} 字符)", head, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Solution;
    use crate::orchestrator::SlotState;
    use serde_json::json;

    #[test]
    fn test_one_line_preview_flattens_and_marks_length() {
        assert_eq!(one_line_preview("model nse\n  layers 11", 9), "model nse… (共 19 字符)");
        assert_eq!(one_line_preview("短文本\n", 10), "短文本");
    }

    #[test]
    fn test_success_rate_from_report() {
        let report = DispatchReport {
            results: vec![Some(Solution::new(json!({"rig_cost": 1}))), None, None, None],
            states: vec![SlotState::Succeeded, SlotState::Failed, SlotState::Failed, SlotState::Failed],
            succeeded: 1,
            failed: 3,
        };
        assert_eq!(success_rate(&report), 25.0);

        let empty = DispatchReport {
            results: vec![],
            states: vec![],
            succeeded: 0,
            failed: 0,
        };
        assert_eq!(success_rate(&empty), 0.0);
    }
}
