//! Telegram Bot API notifier.
//!
//! Sends HTML-formatted messages through `sendMessage`. Any status other
//! than 200 counts as a failed send.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::adapters::transport_failure;
use crate::config::TelegramConfig;
use crate::ports::{DeliveryFailure, DeliveryOutcome, Destination, Notifier};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    bot_token: Option<Secret<String>>,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl TelegramNotifier {
    /// Creates a notifier. Without a token every send fails as not configured.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the HTTP client cannot be built.
    pub fn new(
        bot_token: Option<Secret<String>>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            bot_token,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Creates a notifier from the `telegram` config section.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the HTTP client cannot be built.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, reqwest::Error> {
        let token = config
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Secret::new(t.to_string()));
        Self::new(token, config.api_base_url.clone(), config.timeout())
    }

    async fn send_message(&self, destination: &Destination, text: &str) -> Result<(), DeliveryFailure> {
        let token = self
            .bot_token
            .as_ref()
            .ok_or(DeliveryFailure::NotConfigured("telegram bot token"))?;

        let url = format!("{}/bot{}/sendMessage", self.api_base_url, token.expose_secret());
        let body = SendMessageRequest {
            chat_id: destination.as_str(),
            text,
            parse_mode: "HTML",
        };

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;

        if response.status() != StatusCode::OK {
            return Err(DeliveryFailure::UnexpectedStatus(response.status().as_u16()));
        }

        tracing::debug!(chat_id = %destination, "Telegram message sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &Destination, text: &str) -> DeliveryOutcome {
        self.send_message(destination, text).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn notifier(base_url: String, token: Option<&str>) -> TelegramNotifier {
        TelegramNotifier::new(
            token.map(|t| Secret::new(t.to_string())),
            base_url,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_html_message_to_chat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": "-100500",
                "text": "<b>hi</b>",
                "parse_mode": "HTML"
            })))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let outcome = notifier(server.url(), Some("123:abc"))
            .send(&Destination::new("-100500"), "<b>hi</b>")
            .await;

        assert!(outcome.is_delivered());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_is_a_failed_send() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(403)
            .with_body(r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#)
            .create_async()
            .await;

        let outcome = notifier(server.url(), Some("123:abc"))
            .send(&Destination::new("42"), "hello")
            .await;

        assert_eq!(
            outcome.failure(),
            Some(&DeliveryFailure::UnexpectedStatus(403))
        );
    }

    #[tokio::test]
    async fn missing_token_fails_without_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let outcome = notifier(server.url(), None)
            .send(&Destination::new("42"), "hello")
            .await;

        assert!(matches!(
            outcome.failure(),
            Some(DeliveryFailure::NotConfigured(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_failure() {
        let outcome = notifier("http://127.0.0.1:1".to_string(), Some("123:abc"))
            .send(&Destination::new("42"), "hello")
            .await;

        assert!(matches!(
            outcome.failure(),
            Some(DeliveryFailure::Transport(_))
        ));
    }

    #[tokio::test]
    async fn transport_failure_text_does_not_contain_token() {
        let outcome = notifier("http://127.0.0.1:1".to_string(), Some("123456:SECRET-TOKEN"))
            .send(&Destination::new("42"), "hello")
            .await;

        let failure = outcome.failure().expect("send should fail");
        let text = failure.to_string();
        assert!(!text.contains("SECRET-TOKEN"), "token leaked: {text}");
        assert!(!format!("{failure:?}").contains("SECRET-TOKEN"));
    }

    #[test]
    fn blank_config_token_is_treated_as_missing() {
        let config = TelegramConfig {
            bot_token: Some("  ".to_string()),
            ..TelegramConfig::default()
        };

        let notifier = TelegramNotifier::from_config(&config).unwrap();

        assert!(notifier.bot_token.is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let notifier = notifier("http://localhost:9/".to_string(), None);
        assert_eq!(notifier.api_base_url, "http://localhost:9");
    }
}
