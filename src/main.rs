use anyhow::Context;
use clap::Parser;
use portfolio_contact::utils::logger::{self, LogFormat};
use portfolio_contact::utils::validation::Validate;
use portfolio_contact::{app, build_sender, AppState, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = CliConfig::parse();

    // 初始化日誌
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(cli.verbose, format);

    tracing::info!("Starting portfolio-contact");
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = cli
        .load_app_config()
        .context("failed to load configuration")?;
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e).context("invalid configuration");
    }

    let server = config.server;
    let sender = build_sender(config.mail).context("failed to set up mail transport")?;
    let state = AppState::new(sender, &server.templates_dir, &server.static_dir);

    app::serve(&server, state)
        .await
        .context("server terminated with an error")?;

    Ok(())
}
