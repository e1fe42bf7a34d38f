use crate::domain::model::{ContactForm, MISSING_FIELDS_MESSAGE};
use crate::utils::error::ContactError;
use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use std::fmt::Display;

/// Contact form fields read from either `application/x-www-form-urlencoded`
/// or `multipart/form-data`. Browsers posting a bare `FormData` use the latter.
#[derive(Debug)]
pub struct ContactSubmission(pub ContactForm);

#[async_trait]
impl<S> FromRequest<S> for ContactSubmission
where
    S: Send + Sync,
{
    type Rejection = ContactError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(unreadable)?;
            return read_multipart(multipart).await.map(ContactSubmission);
        }

        let Form(form) = Form::<ContactForm>::from_request(req, state)
            .await
            .map_err(unreadable)?;
        Ok(ContactSubmission(form))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Unknown parts are skipped; a repeated field keeps its last value.
async fn read_multipart(mut multipart: Multipart) -> Result<ContactForm, ContactError> {
    let mut form = ContactForm::default();
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        let slot = match field.name() {
            Some("nombre") => &mut form.nombre,
            Some("email") => &mut form.email,
            Some("mensaje") => &mut form.mensaje,
            _ => continue,
        };
        *slot = field.text().await.map_err(unreadable)?;
    }
    Ok(form)
}

fn unreadable(e: impl Display) -> ContactError {
    tracing::warn!("Unreadable contact form body: {}", e);
    ContactError::validation(MISSING_FIELDS_MESSAGE)
}
