pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{build_sender, OAuthGmailSender, SmtpSender};
pub use app::{build_router, AppState, ContactResponse};
pub use config::{AppConfig, MailConfig, TransportKind};
pub use domain::model::{ContactMessage, OutgoingMail};
pub use domain::ports::MailSender;
pub use utils::error::{ContactError, Result};
