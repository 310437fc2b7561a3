use anyhow::{Context, Result};
use photobooth_core::{config, encoder::PngQrEncoder, web_server};
use std::sync::Arc;

// 指向外部配置文件的环境变量；未设置时使用编译进二进制的默认配置
const CONFIG_ENV: &str = "PHOTOBOOTH_CONFIG";

fn load_config() -> Result<config::AppConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            tracing::info!("Loading config from {}", path);
            config::load_config_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path))
        }
        Err(_) => {
            tracing::info!("{} not set, using built-in config", CONFIG_ENV);
            config::default_config().context("Built-in config is invalid")
        }
    }
}

async fn run() -> Result<()> {
    let app_config = load_config()?;

    let encoder = Arc::new(PngQrEncoder::new());
    web_server::run_server(&app_config.server, encoder)
        .await
        .context("Web server failed")?;

    tracing::info!("🛑 Shutting down.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 初始化日志（这是入口点的职责）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🚀 Starting photobooth share server...");

    // 2. 调用库的核心逻辑
    if let Err(e) = run().await {
        // 3. 处理顶层错误
        tracing::error!("❌ Photobooth server failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
