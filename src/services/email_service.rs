use std::time::Duration;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };

use crate::error::{ AppError, Result };
use crate::providers::{ EmailMessage, EmailSendResult, EmailSender };

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ResendErrorResponse {
    message: Option<String>,
}

/// Email delivery through the Resend HTTP API.
pub struct ResendEmailService {
    client: reqwest::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendEmailService {
    pub fn new(api_key: String, from: String) -> Result<Self> {
        Self::with_endpoint(api_key, from, RESEND_API_URL.to_string())
    }

    pub fn with_endpoint(api_key: String, from: String, endpoint: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("RESEND_API_KEY must not be empty".to_string()));
        }

        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            from,
            endpoint,
        })
    }

    async fn try_send(&self, message: &EmailMessage) -> Result<Option<String>> {
        let body = SendEmailBody {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send().await
            .map_err(|e| AppError::External(format!("Email API error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ResendErrorResponse>().await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::External(format!("Email API rejected message: {}", detail)));
        }

        let parsed: SendEmailResponse = response
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse email response: {}", e)))?;

        Ok(parsed.id)
    }
}

#[async_trait]
impl EmailSender for ResendEmailService {
    async fn send(&self, message: EmailMessage) -> EmailSendResult {
        if message.to.is_empty() {
            return EmailSendResult::failed("no recipients");
        }

        match self.try_send(&message).await {
            Ok(id) => EmailSendResult::sent(id),
            Err(e) => EmailSendResult::failed(e.to_string()),
        }
    }
}
