use crate::config::{AppConfig, TransportKind};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "portfolio-contact")]
#[command(about = "Portfolio site with a contact form relayed to the owner's inbox")]
pub struct CliConfig {
    /// TOML configuration file; environment variables still override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long)]
    pub templates_dir: Option<String>,

    #[arg(long)]
    pub static_dir: Option<String>,

    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// File (if any), then environment, then command-line flags.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_lookup(|key| std::env::var(key).ok())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.templates_dir {
            config.server.templates_dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = dir.clone();
        }
        if let Some(transport) = self.transport {
            config.mail.transport = transport;
        }
    }
}
