use crate::config::AppConfig;
use crate::utils::error::{ContactError, Result};
use regex::{Captures, Regex};
use std::path::Path;

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContactError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置；`${VAR}` 會以環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content, |name| std::env::var(name).ok())?;

        let mut config: AppConfig =
            toml::from_str(&processed).map_err(|e| ContactError::InvalidConfigValueError {
                field: "toml_parsing".to_string(),
                value: String::new(),
                reason: format!("TOML parsing error: {}", e),
            })?;
        config.mail.normalize();
        Ok(config)
    }
}

/// Unset variables expand to an empty string so a missing secret reads as
/// unset rather than as the literal placeholder.
fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| ContactError::config(format!("invalid substitution pattern: {}", e)))?;

    let result = re.replace_all(content, |caps: &Captures| {
        let name = &caps[1];
        lookup(name).unwrap_or_else(|| {
            tracing::warn!("Environment variable {} referenced in config is not set", name);
            String::new()
        })
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportKind;
    use crate::utils::validation::Validate;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000
templates_dir = "site/templates"
static_dir = "site/static"

[mail]
transport = "gmail"
address = "me@example.org"

[mail.gmail]
client_id = "client"
client_secret = "secret"
refresh_token = "refresh"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.static_dir, "site/static");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.mail.transport, TransportKind::Gmail);
        assert_eq!(config.mail.address, "me@example.org");
        assert_eq!(config.mail.smtp.port, 465);
        assert!(config.mail.missing_credentials().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.mail.transport, TransportKind::Smtp);
    }

    #[test]
    fn test_env_var_substitution() {
        let content = "password = \"${PASS}\"\nother = \"${UNSET_VAR}\"";
        let out = substitute_env_vars(content, |name| {
            (name == "PASS").then(|| "app-password".to_string())
        })
        .unwrap();

        assert_eq!(out, "password = \"app-password\"\nother = \"\"");
    }

    #[test]
    fn test_unset_secret_placeholder_is_missing() {
        let toml_content = r#"
[mail.smtp]
password = "${PORTFOLIO_CONTACT_TEST_SURELY_UNSET}"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.mail.smtp.password.is_none());
    }

    #[test]
    fn test_literal_password_is_kept() {
        let toml_content = "[mail.smtp]\npassword = \"abcd efgh\"\n";
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.mail.smtp.password.as_ref().unwrap().expose_secret(),
            "abcd efgh"
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
