use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- Orient 求解服务 ---
    /// 求解服务地址
    pub orient_server_url: String,
    /// 求解接口路径
    pub solve_path: String,
    /// 模型描述文件地址
    pub model_url: String,
    // --- 分发控制 ---
    /// 每批同时发送的请求数
    pub chunk_size: usize,
    /// 单次求解请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 输入输出 ---
    /// 场景 TOML 文件，为空时使用内置的 NSE / SDR 场景
    pub scenario_file: Option<String>,
    /// 导出目录
    pub output_dir: String,
    pub combos_file: String,
    pub results_file: String,
    pub debug_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orient_server_url: "http://localhost:8000".to_string(),
            solve_path: "/solve".to_string(),
            model_url: "https://raw.githubusercontent.com/filecoin-project/specs/nse-calc/src/orient/nse.orient".to_string(),
            chunk_size: 4,
            request_timeout_secs: 120,
            scenario_file: None,
            output_dir: "output".to_string(),
            combos_file: "nse.json".to_string(),
            results_file: "nse-results.json".to_string(),
            debug_file: "nse-debug.json".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            orient_server_url: std::env::var("ORIENT_SERVER_URL").unwrap_or(default.orient_server_url),
            solve_path: std::env::var("ORIENT_SOLVE_PATH").unwrap_or(default.solve_path),
            model_url: std::env::var("ORIENT_MODEL_URL").unwrap_or(default.model_url),
            chunk_size: std::env::var("CHUNK_SIZE").ok().and_then(|v| v.parse().ok()).filter(|&n: &usize| n > 0).unwrap_or(default.chunk_size),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            scenario_file: std::env::var("SCENARIO_FILE").ok().filter(|v| !v.is_empty()).or(default.scenario_file),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            combos_file: std::env::var("COMBOS_FILE").unwrap_or(default.combos_file),
            results_file: std::env::var("RESULTS_FILE").unwrap_or(default.results_file),
            debug_file: std::env::var("DEBUG_FILE").unwrap_or(default.debug_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 完整的求解接口地址
    pub fn solve_endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.orient_server_url.trim_end_matches('/'),
            self.solve_path.trim_start_matches('/')
        )
    }
}
