use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RelayError, Result};
use crate::infra::event_bus::DEFAULT_BUS_CAPACITY;
pub use crate::infra::event_bus::MAX_BUS_CAPACITY;
use crate::push::types::TokenType;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "push-relay.toml";

const LOG_FORMATS: [&str; 4] = ["compact", "pretty", "dev", "json"];

/// Relay 配置
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// 日志级别
    pub log_level: String,
    /// 日志格式: compact / pretty / json
    pub log_format: String,
    /// 事件总线每个 topic 的队列容量
    pub bus_capacity: usize,
    /// 注册 token 的平台类型
    pub token_type: TokenType,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
            token_type: TokenType::Fcm,
        }
    }
}

/// 启动早期的日志配置（完整配置加载之前使用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EarlyLoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// 快速读取日志配置（优先级：命令行 > 环境变量 > 配置文件 [logging] 段）
///
/// 配置文件读不到或格式错误时忽略，错误留给 `RelayConfig::load` 报告。
pub fn load_early_logging_config(cli: &crate::cli::Cli) -> EarlyLoggingConfig {
    let path = cli
        .config_file
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let file_logging = fs::read_to_string(&path)
        .ok()
        .and_then(|content| toml::from_str::<TomlConfig>(&content).ok())
        .and_then(|config| config.logging);
    let (file_level, file_format) = match file_logging {
        Some(logging) => (logging.level, logging.format),
        None => (None, None),
    };

    EarlyLoggingConfig {
        level: cli
            .get_log_level()
            .or_else(|| env::var("PUSH_RELAY_LOG_LEVEL").ok())
            .or(file_level),
        format: cli
            .get_log_format()
            .or_else(|| env::var("PUSH_RELAY_LOG_FORMAT").ok())
            .or(file_format),
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml_config: TomlConfig = toml::from_str(content)?;
        toml_config.try_into()
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RelayError::Configuration(format!(
                "cannot read config file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 序列化为配置文件格式，`from_toml_str` 可以读回
    pub fn to_toml_string(&self) -> Result<String> {
        let toml_config = TomlConfig {
            logging: Some(TomlLoggingConfig {
                level: Some(self.log_level.clone()),
                format: Some(self.log_format.clone()),
            }),
            relay: Some(TomlRelayConfig {
                bus_capacity: Some(self.bus_capacity),
                token_type: Some(self.token_type.to_string()),
            }),
        };
        toml::to_string_pretty(&toml_config)
            .map_err(|e| RelayError::Internal(format!("failed to serialize config: {}", e)))
    }

    /// 从环境变量合并（PUSH_RELAY_ 前缀）
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(level) = env::var("PUSH_RELAY_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Ok(format) = env::var("PUSH_RELAY_LOG_FORMAT") {
            self.log_format = format;
        }
        if let Ok(capacity) = env::var("PUSH_RELAY_BUS_CAPACITY") {
            self.bus_capacity = capacity.parse().map_err(|_| {
                RelayError::Configuration(format!(
                    "PUSH_RELAY_BUS_CAPACITY is not a number: {}",
                    capacity
                ))
            })?;
        }
        if let Ok(token_type) = env::var("PUSH_RELAY_TOKEN_TYPE") {
            self.token_type = parse_token_type(&token_type)?;
        }
        Ok(())
    }

    /// 从命令行参数合并配置
    pub fn merge_from_cli(&mut self, cli: &crate::cli::Cli) {
        if let Some(level) = cli.get_log_level() {
            self.log_level = level;
        }
        if let Some(format) = cli.get_log_format() {
            self.log_format = format;
        }
        if let Some(capacity) = cli.bus_capacity {
            self.bus_capacity = capacity;
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.bus_capacity == 0 || self.bus_capacity > MAX_BUS_CAPACITY {
            return Err(RelayError::Configuration(format!(
                "bus_capacity must be between 1 and {}, got {}",
                MAX_BUS_CAPACITY, self.bus_capacity
            )));
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(RelayError::Configuration(format!(
                "unknown log format: {} (expected one of {:?})",
                self.log_format, LOG_FORMATS
            )));
        }
        Ok(())
    }

    /// 加载配置（按优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    ///
    /// 显式指定的配置文件不存在时返回错误。
    pub fn load(cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if let Some(config_file) = &cli.config_file {
            if !Path::new(config_file).exists() {
                return Err(RelayError::Configuration(format!(
                    "config file not found: {}",
                    config_file
                )));
            }
            info!("Loading config file: {}", config_file);
            Self::from_toml_file(config_file)?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            info!("Loading default config file: {}", DEFAULT_CONFIG_FILE);
            Self::from_toml_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::new()
        };

        config.merge_from_env()?;
        config.merge_from_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// 默认配置文件内容
    pub fn default_toml() -> String {
        let config = Self::default();
        format!(
            "# push-relay 配置文件\n\
             \n\
             [logging]\n\
             level = \"{}\"\n\
             # compact / pretty / json\n\
             format = \"{}\"\n\
             \n\
             [relay]\n\
             # 1 ~ {}\n\
             bus_capacity = {}\n\
             token_type = \"{}\"\n",
            config.log_level,
            config.log_format,
            MAX_BUS_CAPACITY,
            config.bus_capacity,
            config.token_type
        )
    }
}

fn parse_token_type(s: &str) -> Result<TokenType> {
    TokenType::from_str(s)
        .ok_or_else(|| RelayError::Configuration(format!("unsupported token type: {}", s)))
}

/// TOML 配置文件结构
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    logging: Option<TomlLoggingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relay: Option<TomlRelayConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRelayConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    bus_capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
}

impl TryFrom<TomlConfig> for RelayConfig {
    type Error = RelayError;

    fn try_from(toml_config: TomlConfig) -> Result<Self> {
        let mut config = RelayConfig::default();

        if let Some(logging) = toml_config.logging {
            if let Some(level) = logging.level {
                config.log_level = level;
            }
            if let Some(format) = logging.format {
                config.log_format = format;
            }
        }

        if let Some(relay) = toml_config.relay {
            if let Some(capacity) = relay.bus_capacity {
                config.bus_capacity = capacity;
            }
            if let Some(token_type) = relay.token_type {
                config.token_type = parse_token_type(&token_type)?;
            }
        }

        Ok(config)
    }
}
