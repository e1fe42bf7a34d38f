#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_port, validate_url, Validate,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_EMAIL_ADDRESS: &str = "owner@example.com";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
pub const DEFAULT_GMAIL_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Runtime configuration, loaded once at start and handed to the server and
/// the selected mail sender.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub templates_dir: String,
    /// Served verbatim under `/static`.
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Smtp,
    Gmail,
}

impl FromStr for TransportKind {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "gmail" => Ok(Self::Gmail),
            other => Err(ContactError::InvalidConfigValueError {
                field: "MAIL_TRANSPORT".to_string(),
                value: other.to_string(),
                reason: "Expected one of: smtp, gmail".to_string(),
            }),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp => f.write_str("smtp"),
            Self::Gmail => f.write_str("gmail"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub transport: TransportKind,
    /// Owner mailbox: the `From` of SMTP notifications and the `To` of all of them.
    pub address: String,
    pub smtp: SmtpConfig,
    pub gmail: GmailConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            address: DEFAULT_EMAIL_ADDRESS.to_string(),
            smtp: SmtpConfig::default(),
            gmail: GmailConfig::default(),
        }
    }
}

impl MailConfig {
    /// Names of the credentials the selected transport still lacks.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        match self.transport {
            TransportKind::Smtp => {
                if self.smtp.password.is_none() {
                    vec!["EMAIL_PASSWORD"]
                } else {
                    vec![]
                }
            }
            TransportKind::Gmail => {
                let mut missing = Vec::new();
                if self.gmail.client_id.is_none() {
                    missing.push("GMAIL_CLIENT_ID");
                }
                if self.gmail.client_secret.is_none() {
                    missing.push("GMAIL_CLIENT_SECRET");
                }
                if self.gmail.refresh_token.is_none() {
                    missing.push("GMAIL_REFRESH_TOKEN");
                }
                missing
            }
        }
    }

    /// Blank values count as unset, whatever source they came from.
    pub(crate) fn normalize(&mut self) {
        if self.address.trim().is_empty() {
            self.address = DEFAULT_EMAIL_ADDRESS.to_string();
        }
        drop_blank_secret(&mut self.smtp.password);
        drop_blank_secret(&mut self.gmail.client_secret);
        drop_blank_secret(&mut self.gmail.refresh_token);
        if self
            .gmail
            .client_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            self.gmail.client_id = None;
        }
    }
}

fn drop_blank_secret(secret: &mut Option<SecretString>) {
    if secret
        .as_ref()
        .is_some_and(|s| s.expose_secret().trim().is_empty())
    {
        *secret = None;
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<SecretString>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            password: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GmailConfig {
    pub api_base: String,
    pub token_endpoint: String,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GMAIL_API_BASE.to_string(),
            token_endpoint: DEFAULT_GMAIL_TOKEN_ENDPOINT.to_string(),
            client_id: None,
            client_secret: None,
            refresh_token: None,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_non_empty_string("server.templates_dir", &self.server.templates_dir)?;
        validate_non_empty_string("server.static_dir", &self.server.static_dir)?;
        validate_non_empty_string("mail.address", &self.mail.address)?;

        match self.mail.transport {
            TransportKind::Smtp => {
                validate_non_empty_string("mail.smtp.host", &self.mail.smtp.host)?;
                validate_port("mail.smtp.port", self.mail.smtp.port)?;
            }
            TransportKind::Gmail => {
                validate_url("mail.gmail.api_base", &self.mail.gmail.api_base)?;
                validate_url("mail.gmail.token_endpoint", &self.mail.gmail.token_endpoint)?;
            }
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
