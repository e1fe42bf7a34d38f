// Adapters layer: concrete mail transports behind the MailSender port.

pub mod gmail;
pub mod mime;
pub mod smtp;

use crate::config::{MailConfig, TransportKind};
use crate::domain::ports::MailSender;
use crate::utils::error::Result;
use std::sync::Arc;

pub use gmail::OAuthGmailSender;
pub use smtp::SmtpSender;

/// Instantiate the transport selected in configuration.
pub fn build_sender(config: MailConfig) -> Result<Arc<dyn MailSender>> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(
            "⚠️ {} transport is missing {}; contact submissions will fail until it is set",
            config.transport,
            missing.join(", ")
        );
    }

    let sender: Arc<dyn MailSender> = match config.transport {
        TransportKind::Smtp => Arc::new(SmtpSender::new(config)?),
        TransportKind::Gmail => Arc::new(OAuthGmailSender::new(config)?),
    };
    tracing::info!("Mail transport: {}", sender.name());
    Ok(sender)
}
