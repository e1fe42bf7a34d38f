use crate::adapters::mime::{compose, MailIdentity};
use crate::config::MailConfig;
use crate::domain::model::OutgoingMail;
use crate::domain::ports::MailSender;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};

/// Direct submission to an SMTP relay over implicit TLS (SMTPS).
///
/// A transport is built per call and dropped when `send` returns, so the
/// relay connection never outlives the request that opened it.
pub struct SmtpSender {
    host: String,
    port: u16,
    username: String,
    password: Option<SecretString>,
    identity: MailIdentity,
}

impl SmtpSender {
    /// Fails only on an unusable owner address. A missing password is
    /// reported per send.
    pub fn new(config: MailConfig) -> Result<Self> {
        let identity = MailIdentity::owner(&config.address)?;
        Ok(Self {
            host: config.smtp.host,
            port: config.smtp.port,
            username: config.address,
            password: config.smtp.password,
            identity,
        })
    }

    fn credentials(&self) -> Result<Credentials> {
        let password = validate_required_field("EMAIL_PASSWORD", &self.password)?;
        Ok(Credentials::new(
            self.username.clone(),
            password.expose_secret().clone(),
        ))
    }
}

#[async_trait]
impl MailSender for SmtpSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let credentials = self.credentials().inspect_err(|e| {
            tracing::error!("❌ SMTP credentials unavailable: {}", e);
        })?;
        let message = compose(mail, &self.identity)?;

        tracing::debug!("Connecting to {}:{} (implicit TLS)", self.host, self.port);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(classify_smtp_error)?
            .port(self.port)
            .credentials(credentials)
            .build();

        match transport.send(message).await {
            Ok(response) => {
                tracing::info!(
                    "✅ Notification sent to {} via SMTP ({})",
                    self.identity.to,
                    response.code()
                );
                Ok(())
            }
            Err(e) => {
                let err = classify_smtp_error(e);
                tracing::error!(
                    "❌ SMTP send to {} failed ({:?}): {}",
                    self.identity.to,
                    err.category(),
                    err
                );
                Err(err)
            }
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Reply codes a relay uses to refuse a login.
fn is_auth_rejection(code: &str) -> bool {
    matches!(code, "530" | "534" | "535")
}

fn classify_smtp_error(err: lettre::transport::smtp::Error) -> ContactError {
    let code = err.status().map(|c| c.to_string());
    match code.as_deref() {
        Some(code) if is_auth_rejection(code) => ContactError::authentication(err.to_string()),
        _ => ContactError::transport(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContactMessage;
    use crate::utils::error::ErrorCategory;

    fn mail() -> OutgoingMail {
        ContactMessage::new("Ana", "ana@x.com", "Hola")
            .unwrap()
            .into_outgoing()
    }

    #[test]
    fn test_auth_rejection_codes() {
        assert!(is_auth_rejection("535"));
        assert!(is_auth_rejection("534"));
        assert!(is_auth_rejection("530"));
        assert!(!is_auth_rejection("550"));
        assert!(!is_auth_rejection("421"));
    }

    #[tokio::test]
    async fn test_missing_password_fails_before_connecting() {
        let mut config = MailConfig::default();
        // TEST-NET-1, never contacted
        config.smtp.host = "192.0.2.1".to_string();
        config.smtp.password = None;
        let sender = SmtpSender::new(config).unwrap();

        let err = sender.send(&mail()).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_error() {
        let mut config = MailConfig::default();
        // nothing listens on port 1, the connection is refused
        config.smtp.host = "127.0.0.1".to_string();
        config.smtp.port = 1;
        config.smtp.password = Some(SecretString::new("app-password".to_string()));
        let sender = SmtpSender::new(config).unwrap();

        let err = tokio::time::timeout(std::time::Duration::from_secs(10), sender.send(&mail()))
            .await
            .expect("refused connection should fail fast")
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.user_friendly_message(), "Error al enviar el correo");
    }

    #[test]
    fn test_invalid_owner_address_rejected_at_startup() {
        let config = MailConfig {
            address: "owner".to_string(),
            ..MailConfig::default()
        };
        assert!(SmtpSender::new(config).is_err());
    }

    #[test]
    fn sender_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpSender>();
    }
}
