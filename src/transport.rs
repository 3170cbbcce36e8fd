//! Outbound message transport — Twilio Messages API client.
//!
//! The engine never calls this directly; the routes hand it a destination and
//! a body. Behind a trait so tests can observe dispatches without a network.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::TransportError;

/// Capability to deliver one outbound message over the channel provider.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send `body` (plus optional media) to `to`. One attempt, no retries.
    async fn send(
        &self,
        to: &str,
        body: &str,
        media_urls: &[String],
    ) -> Result<SentMessage, TransportError>;
}

/// Provider acknowledgement for a sent message.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    pub status: String,
}

/// Twilio WhatsApp client (basic-auth form POST to the Messages API).
pub struct TwilioClient {
    account_sid: String,
    auth_token: SecretString,
    whatsapp_number: String,
    client: reqwest::Client,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: SecretString, whatsapp_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            whatsapp_number,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` and
    /// `TWILIO_WHATSAPP_NUMBER`. Returns `None` when any of them is unset,
    /// which disables outbound sending without failing startup.
    pub fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok()?;
        let whatsapp_number = std::env::var("TWILIO_WHATSAPP_NUMBER").ok()?;
        Some(Self::new(
            account_sid,
            SecretString::from(auth_token),
            whatsapp_number,
        ))
    }

    fn api_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

/// Ensure a destination carries the `whatsapp:` channel prefix.
pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

#[async_trait]
impl MessageTransport for TwilioClient {
    async fn send(
        &self,
        to: &str,
        body: &str,
        media_urls: &[String],
    ) -> Result<SentMessage, TransportError> {
        let mut params: Vec<(&str, String)> = vec![
            ("From", whatsapp_address(&self.whatsapp_number)),
            ("To", whatsapp_address(to)),
            ("Body", body.to_string()),
        ];
        for url in media_urls {
            params.push(("MediaUrl", url.clone()));
        }

        let response = self
            .client
            .post(self.api_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&params)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body: error_body,
            });
        }

        response
            .json::<SentMessage>()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}
