use crate::config::{AppConfig, TransportKind};
use crate::utils::error::{ContactError, Result};
use secrecy::SecretString;

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup; unset
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        config.apply_lookup(lookup)?;
        Ok(config)
    }

    /// Overlay variables that are set on top of the current values.
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(transport) = var("MAIL_TRANSPORT") {
            self.mail.transport = transport.parse::<TransportKind>()?;
        }
        if let Some(address) = var("EMAIL_ADDRESS") {
            self.mail.address = address.trim().to_string();
        }
        if let Some(password) = var("EMAIL_PASSWORD") {
            self.mail.smtp.password = Some(SecretString::new(password));
        }
        if let Some(host) = var("SMTP_HOST") {
            self.mail.smtp.host = host;
        }
        if let Some(port) = var("SMTP_PORT") {
            self.mail.smtp.port = parse_port("SMTP_PORT", &port)?;
        }

        if let Some(client_id) = var("GMAIL_CLIENT_ID") {
            self.mail.gmail.client_id = Some(client_id);
        }
        if let Some(secret) = var("GMAIL_CLIENT_SECRET") {
            self.mail.gmail.client_secret = Some(SecretString::new(secret));
        }
        if let Some(token) = var("GMAIL_REFRESH_TOKEN") {
            self.mail.gmail.refresh_token = Some(SecretString::new(token));
        }
        if let Some(api_base) = var("GMAIL_API_BASE") {
            self.mail.gmail.api_base = api_base;
        }
        if let Some(endpoint) = var("GMAIL_TOKEN_ENDPOINT") {
            self.mail.gmail.token_endpoint = endpoint;
        }

        self.mail.normalize();
        Ok(())
    }
}

fn parse_port(field: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|e| ContactError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("Invalid port: {}", e),
        })
}
