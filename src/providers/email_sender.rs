use async_trait::async_trait;
use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmailSendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailSendResult {
    pub fn sent(id: Option<String>) -> Self {
        Self { success: true, id, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, id: None, error: Some(error.into()) }
    }
}

/// Outbound email channel. Delivery failures are reported in the result,
/// never as an error, so callers can treat email as best-effort.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> EmailSendResult;
}
