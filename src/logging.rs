use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{RelayError, Result};

/// 初始化日志系统
///
/// `RUST_LOG` 优先于传入的级别。
pub fn init_logging(log_level: &str, log_format: Option<&str>, quiet: bool) -> Result<()> {
    // 静默模式只输出错误
    let level = if quiet { "error" } else { log_level };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match log_format {
        Some("json") => registry.with(fmt::layer().json()).try_init(),
        Some("pretty") | Some("dev") => registry.with(fmt::layer().pretty()).try_init(),
        _ => registry.with(fmt::layer().compact()).try_init(),
    };

    result.map_err(|e| RelayError::Internal(format!("failed to install log subscriber: {}", e)))
}
