use thiserror::Error;

/// Relay 错误类型
///
/// 回调入口（token 刷新、推送到达）本身不返回错误；这里只覆盖
/// payload 解析、配置加载等外围操作。
#[derive(Debug, Error)]
pub enum RelayError {
    /// Payload 解析错误
    #[error("Payload error: {0}")]
    Payload(String),
    /// 配置错误
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Payload(err.to_string())
    }
}

impl From<toml::de::Error> for RelayError {
    fn from(err: toml::de::Error) -> Self {
        RelayError::Configuration(err.to_string())
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RelayError>;
