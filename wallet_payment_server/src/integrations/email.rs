//! The outbound email channel.
//!
//! Confirmation codes are submitted to a transactional email provider over its HTTP API. The
//! provider's retry queue and delivery guarantees are its business; from the payment flow's
//! perspective this call is fire-and-forget, and a failure here never aborts an initiation.
use std::sync::Arc;

use chrono::Duration;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::json;
use thiserror::Error;
use wallet_payment_engine::{
    db_types::{SessionId, TokenCode},
    NotificationError,
    TokenNotifier,
};

use crate::config::EmailConfig;

#[derive(Debug, Clone, Error)]
pub enum EmailApiError {
    #[error("Could not initialize the email client. {0}")]
    Initialization(String),
    #[error("Email API request failed: {0}")]
    RequestError(String),
    #[error("Email API returned an error. {status}: {message}")]
    QueryError { status: u16, message: String },
}

#[derive(Clone)]
pub struct EmailApi {
    config: EmailConfig,
    token_ttl: Duration,
    client: Arc<Client>,
}

impl EmailApi {
    pub fn new(config: EmailConfig, token_ttl: Duration) -> Result<Self, EmailApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(&format!("Bearer {}", config.api_key.reveal()))
            .map_err(|e| EmailApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| EmailApiError::Initialization(e.to_string()))?;
        Ok(Self { config, token_ttl, client: Arc::new(client) })
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> Result<(), EmailApiError> {
        let message = json!({
            "from": self.config.sender,
            "to": to,
            "subject": subject,
            "text": text,
            "html": html,
        });
        trace!("📧️ Submitting message to {}", self.config.api_url);
        let response = self
            .client
            .post(&self.config.api_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| EmailApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("📧️ Message submitted. {}", response.status());
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| EmailApiError::RequestError(e.to_string()))?;
            Err(EmailApiError::QueryError { status, message })
        }
    }
}

impl TokenNotifier for EmailApi {
    async fn send_token(
        &self,
        email: &str,
        token: &TokenCode,
        session_id: &SessionId,
    ) -> Result<(), NotificationError> {
        let minutes = self.token_ttl.num_minutes();
        let subject = "Confirmation code for your payment";
        let text = format!("Your confirmation code is: {}\nSession id: {session_id}", token.as_str());
        let html = format!(
            "<h2>Confirmation code for your payment</h2>\
             <p>Your confirmation code is: <strong>{}</strong></p>\
             <p>Session id: <strong>{session_id}</strong></p>\
             <p>This code expires in {minutes} minutes.</p>",
            token.as_str()
        );
        self.send(email, subject, &text, &html).await.map_err(|e| NotificationError(e.to_string()))
    }
}
