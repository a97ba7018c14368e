use clap::{Parser, Subcommand};

impl Cli {
    /// 解析命令行参数
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// push-relay - 推送消息本地转发
#[derive(Parser, Debug)]
#[command(name = "push-relay")]
#[command(version)]
#[command(about = "Relay push deliveries into in-process events", long_about = None)]
pub struct Cli {
    /// 配置文件路径
    #[arg(long, value_name = "FILE", global = true)]
    pub config_file: Option<String>,

    /// 日志级别: trace, debug, info, warn, error
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// 日志格式: pretty, json, compact
    #[arg(long, value_name = "FORMAT", global = true)]
    pub log_format: Option<String>,

    /// 事件总线队列容量
    #[arg(long, value_name = "NUM", global = true)]
    pub bus_capacity: Option<usize>,

    /// 详细输出（-v, -vv, -vvv）
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 静默模式
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 模拟 token 刷新，打印激活子系统收到的注册
    Token {
        /// 注册 token
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// 模拟一次推送到达，打印转发出的本地事件（JSON lines）
    Relay {
        /// 推送 payload JSON，例如 '{"data":{"foo":"bar"}}'
        #[arg(value_name = "PAYLOAD_JSON")]
        payload: String,
    },
    /// 生成默认配置文件
    GenerateConfig {
        #[arg(value_name = "PATH", default_value = crate::config::DEFAULT_CONFIG_FILE)]
        path: String,
    },
    /// 验证配置文件
    ValidateConfig {
        #[arg(value_name = "PATH", default_value = crate::config::DEFAULT_CONFIG_FILE)]
        path: String,
    },
    /// 显示最终配置（合并后的配置）
    ShowConfig,
}

impl Cli {
    /// 获取日志级别（考虑 verbose 和 quiet）
    pub fn get_log_level(&self) -> Option<String> {
        if self.quiet {
            return Some("error".to_string());
        }

        if let Some(level) = &self.log_level {
            return Some(level.clone());
        }

        match self.verbose {
            0 => None,
            1 => Some("info".to_string()),
            2 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        }
    }

    pub fn get_log_format(&self) -> Option<String> {
        self.log_format.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["push-relay", "-vv", "show-config"]);
        assert_eq!(cli.get_log_level().as_deref(), Some("debug"));

        let cli = Cli::parse_from(["push-relay", "--log-level", "warn", "-v"]);
        assert_eq!(cli.get_log_level().as_deref(), Some("warn"));

        let cli = Cli::parse_from(["push-relay", "-q", "--log-level", "warn"]);
        assert_eq!(cli.get_log_level().as_deref(), Some("error"));

        assert_eq!(Cli::parse_from(["push-relay"]).get_log_level(), None);
    }

    #[test]
    fn test_relay_subcommand() {
        let cli = Cli::parse_from(["push-relay", "relay", r#"{"data":{"foo":"bar"}}"#]);
        match cli.command {
            Some(Commands::Relay { payload }) => assert!(payload.contains("foo")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
