use crate::domain::model::OutgoingMail;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound transport for contact notifications.
///
/// Implementations log their own failures and report them as a classified
/// [`crate::ContactError`]; they never retry.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;

    /// Short transport name for logs.
    fn name(&self) -> &'static str;
}
