use crate::utils::error::{ContactError, Result};
use crate::utils::validation::has_email_shape;
use serde::Deserialize;

pub const MISSING_FIELDS_MESSAGE: &str = "Todos los campos son requeridos";
pub const INVALID_EMAIL_MESSAGE: &str = "Email inválido";

/// Raw fields of the contact form. Absent fields deserialize to empty strings
/// so they fail validation instead of the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mensaje: String,
}

/// A validated visitor message. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub sender_name: String,
    pub sender_email: String,
    pub body: String,
}

impl ContactMessage {
    pub fn new(name: &str, email: &str, body: &str) -> Result<Self> {
        let (name, email, body) = (name.trim(), email.trim(), body.trim());

        if name.is_empty() || email.is_empty() || body.is_empty() {
            return Err(ContactError::validation(MISSING_FIELDS_MESSAGE));
        }
        if !has_email_shape(email) {
            return Err(ContactError::validation(INVALID_EMAIL_MESSAGE));
        }

        Ok(Self {
            sender_name: name.to_string(),
            sender_email: email.to_string(),
            body: body.to_string(),
        })
    }

    pub fn subject(&self) -> String {
        format!("Nuevo mensaje de {}", self.sender_name)
    }

    pub fn notification_body(&self) -> String {
        format!(
            "Nuevo mensaje de contacto:\n\nNombre: {}\nEmail: {}\n\nMensaje:\n{}\n",
            self.sender_name, self.sender_email, self.body
        )
    }

    pub fn into_outgoing(self) -> OutgoingMail {
        OutgoingMail {
            subject: self.subject(),
            body: self.notification_body(),
            reply_to: Some(self.sender_email),
        }
    }
}

impl TryFrom<ContactForm> for ContactMessage {
    type Error = ContactError;

    fn try_from(form: ContactForm) -> Result<Self> {
        Self::new(&form.nombre, &form.email, &form.mensaje)
    }
}

/// Notification handed to a [`crate::domain::ports::MailSender`]. The
/// recipient is not part of it: senders always deliver to the configured
/// owner address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}
