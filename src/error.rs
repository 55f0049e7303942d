use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 查询编译错误
    #[error("查询错误: {0}")]
    Query(#[from] QueryError),
    /// 批量分发错误
    #[error("分发错误: {0}")]
    Dispatch(#[from] DispatchError),
    /// 求解服务不可达
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// JSON 解析/序列化失败
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML 解析失败
    #[error("TOML错误: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 查询编译错误（InvalidInputError）
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    /// 输入的配置不合法
    #[error("无效输入: {reason}")]
    InvalidInput { reason: String },
}

impl QueryError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        QueryError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// 单个组合求解失败
///
/// 不会向调用方抛出，只会被转换成结果序列中的 `None`
#[derive(Debug, Error)]
pub enum SolveError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务返回非 2xx 状态码
    #[error("求解服务返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应体无法解析
    #[error("响应解析失败: {0}")]
    Decode(String),
    /// 求解器报告无可行解
    #[error("求解器报告无解: {0}")]
    Infeasible(String),
    /// 超过单次请求时限
    #[error("请求超时 ({0:?})")]
    Timeout(std::time::Duration),
    /// 任务执行异常
    #[error("任务执行失败: {0}")]
    TaskPanicked(String),
}

/// 整批无法开始的连接错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 无法连接到求解服务
    #[error("无法连接到求解服务 ({endpoint}): {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 在时限内没有收到服务响应
    #[error("求解服务响应超时 ({endpoint}, {timeout:?})")]
    Timeout {
        endpoint: String,
        timeout: std::time::Duration,
    },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// 批量分发错误
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// 并发数必须为正整数
    #[error("并发数必须大于 0")]
    InvalidConcurrency,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

impl TransportError {
    /// 创建服务不可达错误
    pub fn unreachable(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TransportError::Unreachable {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
