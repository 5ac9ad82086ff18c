use std::sync::Arc;

use chrono::{ DateTime, Utc };

use crate::db::NotificationRepository;
use crate::models::{ Alert, NewNotification, TriggerContext };
use crate::notifications::templates;
use crate::providers::{ EmailMessage, EmailSender };

/// What happened on each channel for one fired alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub notification_saved: bool,
    pub email_sent: bool,
}

/// Writes the in-app notification and sends the email for a fired alert.
///
/// The two channels are independent: either may fail without affecting the
/// other, and neither failure is reported as an error to the caller.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    email_sender: Option<Arc<dyn EmailSender>>,
    recipients: Vec<String>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        email_sender: Option<Arc<dyn EmailSender>>,
        recipients: Vec<String>
    ) -> Self {
        Self {
            notifications,
            email_sender,
            recipients,
        }
    }

    pub async fn dispatch(
        &self,
        alert: &Alert,
        context: &TriggerContext,
        triggered_at: DateTime<Utc>
    ) -> DispatchReport {
        let rendered = templates::render(alert, context);

        let record = NewNotification {
            alert_id: alert.id,
            address: alert.address.clone(),
            title: rendered.title.clone(),
            message: rendered.message.clone(),
            notification_type: context.alert_type,
            triggered_at,
        };

        let notification_saved = match self.notifications.create(record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to store notification for alert {}: {}", alert.id, e);
                false
            }
        };

        let email_sent = self.send_email(alert, &rendered).await;

        DispatchReport {
            notification_saved,
            email_sent,
        }
    }

    async fn send_email(&self, alert: &Alert, rendered: &templates::RenderedNotification) -> bool {
        let sender = match &self.email_sender {
            Some(sender) => sender,
            None => {
                tracing::debug!("Email sender not configured, skipping email for alert {}", alert.id);
                return false;
            }
        };

        if self.recipients.is_empty() {
            tracing::debug!("No email recipients configured, skipping email for alert {}", alert.id);
            return false;
        }

        let message = EmailMessage {
            to: self.recipients.clone(),
            subject: rendered.title.clone(),
            html: templates::render_email_html(rendered),
        };

        let result = sender.send(message).await;
        if result.success {
            tracing::info!(
                "Alert email sent for {} (id: {})",
                alert.id,
                result.id.as_deref().unwrap_or("-")
            );
        } else {
            tracing::warn!(
                "Alert email failed for {}: {}",
                alert.id,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        result.success
    }
}
