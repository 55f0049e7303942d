/// Orient 求解服务客户端
///
/// 封装所有与 Orient HTTP 服务相关的调用逻辑
use crate::config::Config;
use crate::error::{SolveError, TransportError};
use crate::models::{Combo, Solution};
use crate::services::Solver;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Orient 客户端
#[derive(Clone)]
pub struct OrientClient {
    http: reqwest::Client,
    base_url: String,
    solve_endpoint: String,
    request_timeout: std::time::Duration,
}

impl OrientClient {
    /// 创建新的 Orient 客户端
    ///
    /// 所有请求（连通性检查、模型拉取、求解）都受 `request_timeout` 约束
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.request_timeout())
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.orient_server_url.trim_end_matches('/').to_string(),
            solve_endpoint: config.solve_endpoint(),
            request_timeout: config.request_timeout(),
        })
    }

    /// 拉取模型描述文件
    ///
    /// 追加 `time` 参数避免拿到缓存的旧版本，返回原始文本
    pub async fn fetch_model(&self, model_url: &str) -> Result<String> {
        let url = cache_busted_url(model_url, &chrono::Utc::now().to_rfc3339());
        debug!("拉取模型文件: {}", url);

        let text = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("无法请求模型文件: {}", model_url))?
            .error_for_status()
            .with_context(|| format!("模型文件返回错误状态: {}", model_url))?
            .text()
            .await
            .context("无法读取模型文件内容")?;

        Ok(text)
    }

    /// 检查求解服务返回的内容是否表示求解失败
    pub fn is_infeasible(result: &Value) -> bool {
        result.is_null() || result.get("error").map_or(false, |e| !e.is_null())
    }
}

/// 在 URL 上追加 `time=<stamp>` 查询参数
pub fn cache_busted_url(url: &str, stamp: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    let encoded: String = stamp
        .chars()
        .map(|c| match c {
            ':' => "%3A".to_string(),
            '+' => "%2B".to_string(),
            c => c.to_string(),
        })
        .collect();
    format!("{}{}time={}", url, separator, encoded)
}

#[async_trait]
impl Solver for OrientClient {
    fn endpoint(&self) -> String {
        self.base_url.clone()
    }

    async fn check_ready(&self) -> Result<(), TransportError> {
        // 任何 HTTP 响应都说明服务可达，状态码不重要
        match self.http.get(&self.base_url).send().await {
            Ok(response) => {
                debug!("求解服务可达: {} ({})", self.base_url, response.status());
                Ok(())
            }
            Err(e) if e.is_timeout() => Err(TransportError::Timeout {
                endpoint: self.base_url.clone(),
                timeout: self.request_timeout,
            }),
            Err(e) => Err(TransportError::unreachable(self.base_url.clone(), e)),
        }
    }

    async fn solve(&self, combo: &Combo) -> Result<Solution, SolveError> {
        debug!("提交求解请求: {} 个字段", combo.len());

        let response = self
            .http
            .post(&self.solve_endpoint)
            .json(combo)
            .send()
            .await
            .map_err(|source| SolveError::Request {
                endpoint: self.solve_endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SolveError::BadStatus {
                endpoint: self.solve_endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SolveError::Decode(e.to_string()))?;

        if Self::is_infeasible(&body) {
            let reason = body
                .get("error")
                .map(|e| e.to_string())
                .unwrap_or_else(|| "null".to_string());
            return Err(SolveError::Infeasible(reason));
        }

        Ok(Solution::new(body))
    }
}
