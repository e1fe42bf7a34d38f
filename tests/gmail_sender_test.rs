use httpmock::prelude::*;
use portfolio_contact::utils::error::ErrorCategory;
use portfolio_contact::{
    ContactMessage, MailConfig, MailSender, OAuthGmailSender, OutgoingMail, TransportKind,
};
use secrecy::SecretString;

fn gmail_config(server: &MockServer) -> MailConfig {
    let mut config = MailConfig {
        transport: TransportKind::Gmail,
        address: "owner@example.com".to_string(),
        ..MailConfig::default()
    };
    config.gmail.api_base = server.base_url();
    config.gmail.token_endpoint = server.url("/token");
    config.gmail.client_id = Some("client-id".to_string());
    config.gmail.client_secret = Some(SecretString::new("client-secret".to_string()));
    config.gmail.refresh_token = Some(SecretString::new("refresh-token".to_string()));
    config
}

fn outgoing() -> OutgoingMail {
    ContactMessage::new("Ana", "ana@x.com", "Hola")
        .unwrap()
        .into_outgoing()
}

#[tokio::test]
async fn test_send_refreshes_token_and_posts_raw_message() {
    let server = MockServer::start();

    let token_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .body_contains("grant_type=refresh_token")
            .body_contains("refresh_token=refresh-token")
            .body_contains("client_id=client-id");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            }));
    });

    let send_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/gmail/v1/users/me/messages/send")
            .header("authorization", "Bearer ya29.test-token")
            .body_contains("\"raw\"");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "id": "18c1f0", "threadId": "18c1f0" }));
    });

    let sender = OAuthGmailSender::new(gmail_config(&server)).unwrap();
    sender.send(&outgoing()).await.unwrap();

    token_mock.assert();
    send_mock.assert();
}

#[tokio::test]
async fn test_access_token_is_cached_between_sends() {
    let server = MockServer::start();

    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "cached", "expires_in": 3599 }));
    });
    let send_mock = server.mock(|when, then| {
        when.method(POST).path("/gmail/v1/users/me/messages/send");
        then.status(200).json_body(serde_json::json!({ "id": "1" }));
    });

    let sender = OAuthGmailSender::new(gmail_config(&server)).unwrap();
    sender.send(&outgoing()).await.unwrap();
    sender.send(&outgoing()).await.unwrap();

    token_mock.assert_hits(1);
    send_mock.assert_hits(2);
}

#[tokio::test]
async fn test_revoked_refresh_token_is_authentication_error() {
    let server = MockServer::start();

    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400).json_body(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        }));
    });
    let send_mock = server.mock(|when, then| {
        when.method(POST).path("/gmail/v1/users/me/messages/send");
        then.status(200).json_body(serde_json::json!({ "id": "1" }));
    });

    let sender = OAuthGmailSender::new(gmail_config(&server)).unwrap();
    let err = sender.send(&outgoing()).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Authentication);
    token_mock.assert();
    send_mock.assert_hits(0);
}

#[tokio::test]
async fn test_api_rejecting_token_is_authentication_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "stale", "expires_in": 3599 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/gmail/v1/users/me/messages/send");
        then.status(401);
    });

    let sender = OAuthGmailSender::new(gmail_config(&server)).unwrap();
    let err = sender.send(&outgoing()).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Authentication);
    assert_eq!(err.user_friendly_message(), "Error al enviar el correo");
}

#[tokio::test]
async fn test_api_server_error_is_transport_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "ok", "expires_in": 3599 }));
    });
    let send_mock = server.mock(|when, then| {
        when.method(POST).path("/gmail/v1/users/me/messages/send");
        then.status(503).body("backend unavailable");
    });

    let sender = OAuthGmailSender::new(gmail_config(&server)).unwrap();
    let err = sender.send(&outgoing()).await.unwrap_err();

    // no retry
    send_mock.assert_hits(1);
    assert_eq!(err.category(), ErrorCategory::Transport);
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_missing_client_credentials_skip_network() {
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "unused", "expires_in": 3599 }));
    });

    let mut config = gmail_config(&server);
    config.gmail.refresh_token = None;
    let sender = OAuthGmailSender::new(config).unwrap();

    let err = sender.send(&outgoing()).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    token_mock.assert_hits(0);
}
