use crate::domain::model::OutgoingMail;
use crate::utils::error::{ContactError, Result};
use lettre::message::{header::ContentType, Mailbox};
use lettre::Message;

/// Sender and recipient of every notification. Both are the site owner.
#[derive(Debug, Clone)]
pub struct MailIdentity {
    pub from: Mailbox,
    pub to: Mailbox,
}

impl MailIdentity {
    pub fn owner(address: &str) -> Result<Self> {
        let mailbox: Mailbox =
            address
                .trim()
                .parse()
                .map_err(|e| ContactError::InvalidConfigValueError {
                    field: "EMAIL_ADDRESS".to_string(),
                    value: address.to_string(),
                    reason: format!("Not a valid mailbox: {}", e),
                })?;
        Ok(Self {
            from: mailbox.clone(),
            to: mailbox,
        })
    }
}

/// Build the plain-text notification. A visitor address that does not parse
/// as a mailbox is dropped from `Reply-To` rather than failing the send.
pub fn compose(mail: &OutgoingMail, identity: &MailIdentity) -> Result<Message> {
    let mut builder = Message::builder()
        .from(identity.from.clone())
        .to(identity.to.clone())
        .subject(mail.subject.as_str());

    if let Some(reply_to) = mail.reply_to.as_deref() {
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => tracing::warn!("Omitting Reply-To {:?}: {}", reply_to, e),
        }
    }

    let message = builder
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())?;
    Ok(message)
}
