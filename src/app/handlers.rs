use crate::app::extract::ContactSubmission;
use crate::app::response::ContactResponse;
use crate::app::state::AppState;
use crate::domain::model::ContactMessage;
use crate::utils::error::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

/// GET /
pub async fn home(State(state): State<AppState>) -> Response {
    let path = state.templates_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to read template {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Página no disponible").into_response()
        }
    }
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// POST /send_email
///
/// Validates the form, relays it to the owner and answers with a
/// [`ContactResponse`]. Failures of any kind come back as JSON through
/// `ContactError`'s `IntoResponse`.
pub async fn send_email(
    State(state): State<AppState>,
    ContactSubmission(form): ContactSubmission,
) -> Result<Json<ContactResponse>> {
    let message = ContactMessage::try_from(form).inspect_err(|e| {
        tracing::info!("Contact form rejected: {}", e);
    })?;

    tracing::info!(
        "📨 Contact form submission from {} <{}>",
        message.sender_name,
        message.sender_email
    );

    let outgoing = message.into_outgoing();
    state.sender.send(&outgoing).await.inspect_err(|e| {
        tracing::warn!(
            "Contact notification not delivered via {} ({:?})",
            state.sender.name(),
            e.category()
        );
    })?;

    Ok(Json(ContactResponse::sent()))
}
