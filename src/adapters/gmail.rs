use crate::adapters::mime::{compose, MailIdentity};
use crate::config::MailConfig;
use crate::domain::model::OutgoingMail;
use crate::domain::ports::MailSender;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

/// Refresh this long before Google's stated expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

struct CachedToken {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - TimeDelta::seconds(EXPIRY_MARGIN_SECS) > now
    }
}

/// Sends through the Gmail REST API as the authorised account.
///
/// Holds a long-lived OAuth refresh token and trades it for short-lived
/// access tokens, kept in memory only.
pub struct OAuthGmailSender {
    client: Client,
    api_base: String,
    token_endpoint: String,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    refresh_token: Option<SecretString>,
    identity: MailIdentity,
    token: Mutex<Option<CachedToken>>,
}

impl OAuthGmailSender {
    pub fn new(config: MailConfig) -> Result<Self> {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: MailConfig, client: Client) -> Result<Self> {
        let identity = MailIdentity::owner(&config.address)?;
        let gmail = config.gmail;
        Ok(Self {
            client,
            api_base: gmail.api_base.trim_end_matches('/').to_string(),
            token_endpoint: gmail.token_endpoint,
            client_id: gmail.client_id,
            client_secret: gmail.client_secret,
            refresh_token: gmail.refresh_token,
            identity,
            token: Mutex::new(None),
        })
    }

    fn send_url(&self) -> String {
        format!("{}/gmail/v1/users/me/messages/send", self.api_base)
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.access_token.expose_secret().clone());
        }

        let client_id = validate_required_field("GMAIL_CLIENT_ID", &self.client_id)?;
        let client_secret = validate_required_field("GMAIL_CLIENT_SECRET", &self.client_secret)?;
        let refresh_token = validate_required_field("GMAIL_REFRESH_TOKEN", &self.refresh_token)?;

        tracing::debug!("Refreshing Gmail access token");
        let response = self
            .client
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.expose_secret().as_str()),
                ("refresh_token", refresh_token.expose_secret().as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| ContactError::transport(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_token_failure(status, &body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ContactError::transport(format!("malformed token response: {}", e)))?;
        let expires_in = token.expires_in.clamp(0, 86_400);
        let access_token = token.access_token.clone();

        *cached = Some(CachedToken {
            access_token: SecretString::new(token.access_token),
            expires_at: Utc::now() + TimeDelta::seconds(expires_in),
        });
        Ok(access_token)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    async fn deliver(&self, mail: &OutgoingMail) -> Result<String> {
        let access_token = self.access_token().await?;
        let message = compose(mail, &self.identity)?;
        let raw = URL_SAFE.encode(message.formatted());

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await
            .map_err(|e| ContactError::transport(format!("Gmail API request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.forget_token().await;
            return Err(ContactError::authentication(format!(
                "Gmail API rejected the access token ({})",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContactError::transport(format!(
                "Gmail API returned {}: {}",
                status, body
            )));
        }

        let sent: SentMessage = response
            .json()
            .await
            .map_err(|e| ContactError::transport(format!("malformed Gmail API response: {}", e)))?;
        Ok(sent.id)
    }
}

#[async_trait]
impl MailSender for OAuthGmailSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        match self.deliver(mail).await {
            Ok(id) => {
                tracing::info!(
                    "✅ Notification sent to {} via Gmail API (id {})",
                    self.identity.to,
                    id
                );
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    "❌ Gmail API send to {} failed ({:?}): {}",
                    self.identity.to,
                    err.category(),
                    err
                );
                Err(err)
            }
        }
    }

    fn name(&self) -> &'static str {
        "gmail"
    }
}

/// A refused refresh token or client is a credentials problem; anything else
/// from the token endpoint is treated as a transport failure.
fn classify_token_failure(status: StatusCode, body: &str) -> ContactError {
    let oauth_error = serde_json::from_str::<OAuthErrorBody>(body).ok();
    let rejected = status == StatusCode::UNAUTHORIZED
        || oauth_error.as_ref().is_some_and(|e| {
            matches!(
                e.error.as_str(),
                "invalid_grant" | "invalid_client" | "unauthorized_client"
            )
        });

    let detail = match &oauth_error {
        Some(e) => format!(
            "{} {}",
            e.error,
            e.error_description.as_deref().unwrap_or_default()
        ),
        None => body.to_string(),
    };

    if rejected {
        ContactError::authentication(format!("token refresh rejected ({}): {}", status, detail.trim()))
    } else {
        ContactError::transport(format!("token endpoint returned {}: {}", status, detail.trim()))
    }
}
