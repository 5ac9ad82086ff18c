use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::enums::{ AlertOperator, AlertType };

/// A user-defined watch condition over a token price or a wallet's total value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    /// Owning wallet address, lower-cased.
    pub address: String,
    pub alert_type: AlertType,
    /// Set for price alerts only.
    pub token_symbol: Option<String>,
    pub operator: AlertOperator,
    /// Threshold. For percent operators, a percentage (10 means 10%).
    pub value: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_triggered: Option<DateTime<Utc>>,
}

/// Timestamped observation of a wallet's aggregate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub address: String,
    pub total_value: f64,
    pub created_at: DateTime<Utc>,
}

/// A notification row about to be written for a fired alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNotification {
    pub alert_id: Uuid,
    pub address: String,
    pub title: String,
    pub message: String,
    pub notification_type: AlertType,
    pub triggered_at: DateTime<Utc>,
}

/// What the evaluator observed when an alert fired.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerContext {
    pub alert_type: AlertType,
    pub current_value: f64,
    pub token_symbol: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProcessingMetrics {
    pub alerts_evaluated: u64,
    pub alerts_triggered: u64,
}

/// Result of one sweep over all enabled alerts.
///
/// A run that could not even load its alert set is `Failed`; it still
/// exposes zero metrics so callers that only care about counts keep working,
/// but schedulers can tell it apart from an empty run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(AlertProcessingMetrics),
    Failed {
        error: String,
    },
}

impl RunOutcome {
    pub fn metrics(&self) -> AlertProcessingMetrics {
        match self {
            RunOutcome::Completed(metrics) => *metrics,
            RunOutcome::Failed { .. } => AlertProcessingMetrics::default(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}
