use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use push_relay::{
    cli::{Cli, Commands},
    config::{self, RelayConfig},
    logging, EventFilter, InboundPush, LocalEventBus, LoggingActivation, PushMessagingHandler,
    PushRelayService, QueuedActivation, RelayEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::GenerateConfig { path }) => return generate_config(path),
        Some(Commands::ValidateConfig { path }) => return validate_config(path),
        _ => {}
    }

    // 先按 命令行 > 环境变量 > 配置文件 初始化日志，加载配置时的日志才有输出
    let early_log = config::load_early_logging_config(&cli);
    let log_level = early_log.level.unwrap_or_else(|| "info".to_string());
    logging::init_logging(&log_level, early_log.format.as_deref(), cli.quiet)?;

    let config = RelayConfig::load(&cli).context("failed to load configuration")?;

    match cli.command {
        Some(Commands::Token { token }) => run_token(&config, &token).await,
        Some(Commands::Relay { payload }) => run_relay(&config, &payload),
        Some(Commands::ShowConfig) | None => show_config(&config),
        Some(Commands::GenerateConfig { .. }) | Some(Commands::ValidateConfig { .. }) => Ok(()),
    }
}

/// 走一遍 token 刷新，打印激活队列收到的注册
async fn run_token(config: &RelayConfig, token: &str) -> Result<()> {
    let (activation, mut registrations) = QueuedActivation::channel();
    let bus = Arc::new(LocalEventBus::with_capacity(config.bus_capacity));
    let service = PushRelayService::from_config(config, Arc::new(activation), bus);

    service.on_new_token(token);
    drop(service);

    while let Some(registration) = registrations.recv().await {
        println!("{}", serde_json::to_string(&registration)?);
    }
    Ok(())
}

/// 走一遍推送到达，打印总线上收到的事件
fn run_relay(config: &RelayConfig, payload: &str) -> Result<()> {
    let message = InboundPush::from_json(payload).context("invalid push payload")?;

    let bus = Arc::new(LocalEventBus::with_capacity(config.bus_capacity));
    let received = Arc::new(Mutex::new(Vec::<RelayEvent>::new()));
    let sink = Arc::clone(&received);
    bus.register_receiver(
        EventFilter::all(),
        Arc::new(move |event: &RelayEvent| sink.lock().push(event.clone())),
    );

    let service = PushRelayService::from_config(config, Arc::new(LoggingActivation), bus);
    service.on_message_received(&message);

    let received = received.lock();
    if received.is_empty() {
        tracing::info!("No event relayed for an empty push");
    }
    for event in received.iter() {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn generate_config(path: &str) -> Result<()> {
    fs::write(path, RelayConfig::default_toml())
        .with_context(|| format!("failed to write config file: {}", path))?;
    println!("Config written to {}", path);
    Ok(())
}

fn validate_config(path: &str) -> Result<()> {
    let config = RelayConfig::from_toml_file(path)?;
    config.validate()?;
    println!("Config {} is valid", path);
    Ok(())
}

fn show_config(config: &RelayConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
