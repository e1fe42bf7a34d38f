use crate::domain::ports::MailSender;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared, read-only per-process state.
#[derive(Clone)]
pub struct AppState {
    pub sender: Arc<dyn MailSender>,
    pub templates_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        sender: Arc<dyn MailSender>,
        templates_dir: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sender,
            templates_dir: Arc::new(templates_dir.into()),
            static_dir: Arc::new(static_dir.into()),
        }
    }
}
