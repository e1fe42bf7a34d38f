use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Mail relay rejected credentials: {message}")]
    AuthenticationError { message: String },

    #[error("Mail transport failure: {message}")]
    TransportError { message: String },

    #[error("Failed to build email message: {0}")]
    MessageError(#[from] lettre::error::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Authentication,
    Transport,
    Internal,
}

impl ContactError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::AuthenticationError {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::AuthenticationError { .. } => ErrorCategory::Authentication,
            Self::TransportError { .. } => ErrorCategory::Transport,
            Self::MessageError(_) | Self::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status the contact endpoint answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            _ => 500,
        }
    }

    /// Text that is safe to show to a site visitor. Only validation errors
    /// echo their own message; everything else maps to a fixed sentence.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            _ => match self.category() {
                ErrorCategory::Configuration => {
                    "El servicio de correo no está configurado".to_string()
                }
                _ => "Error al enviar el correo".to_string(),
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the submitted form fields",
            ErrorCategory::Configuration => {
                "Set EMAIL_ADDRESS/EMAIL_PASSWORD (smtp) or GMAIL_* variables (gmail)"
            }
            ErrorCategory::Authentication => {
                "Verify the application password or refresh token is still valid"
            }
            ErrorCategory::Transport => "Check network access to the mail relay",
            ErrorCategory::Internal => "Inspect the logs for the failing message",
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        let err = ContactError::validation("Email inválido");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.user_friendly_message(), "Email inválido");
    }

    #[test]
    fn test_mail_failures_hide_internal_detail() {
        let err = ContactError::authentication("535 5.7.8 Username and Password not accepted");
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.user_friendly_message(), "Error al enviar el correo");

        let err = ContactError::transport("connection refused");
        assert_eq!(err.status_code(), 500);
        assert!(!err.user_friendly_message().contains("refused"));
    }

    #[test]
    fn test_missing_config_is_configuration_category() {
        let err = ContactError::MissingConfigError {
            field: "EMAIL_PASSWORD".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.status_code(), 500);
        assert!(!err.user_friendly_message().contains("EMAIL_PASSWORD"));
    }
}
