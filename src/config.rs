use std::env;

use crate::alerts::cooldown::{ CooldownGuard, DEFAULT_COOLDOWN_MINUTES };
use crate::services::price_service::DEFAULT_PRICE_API_BASE;

const DEFAULT_EMAIL_FROM: &str = "Alerts <alerts@localhost>";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cooldown_minutes: i64,
    /// In-process schedule period; `None` leaves scheduling to the HTTP trigger.
    pub check_interval_secs: Option<u64>,
    pub cron_secret: Option<String>,
    /// Fallback recipients for alert emails.
    pub notification_email_to: Vec<String>,
    pub notification_email_from: String,
    pub resend_api_key: Option<String>,
    pub price_api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let cooldown_minutes: i64 = match optional_var("ALERT_COOLDOWN_MINUTES") {
            Some(value) => value.parse()?,
            None => DEFAULT_COOLDOWN_MINUTES,
        };
        CooldownGuard::new(cooldown_minutes).map_err(|e| format!("ALERT_COOLDOWN_MINUTES: {}", e))?;

        let check_interval_secs = match optional_var("ALERT_CHECK_INTERVAL_SECS") {
            Some(value) => Some(value.parse::<u64>()?).filter(|secs| *secs > 0),
            None => None,
        };

        let notification_email_to = optional_var("NOTIFICATION_EMAIL_TO")
            .map(|value| Self::parse_list(&value))
            .unwrap_or_default();

        let notification_email_from = optional_var("NOTIFICATION_EMAIL_FROM")
            .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string());

        Ok(Config {
            database_url,
            server_host,
            server_port,
            cooldown_minutes,
            check_interval_secs,
            cron_secret: optional_var("CRON_SECRET"),
            notification_email_to,
            notification_email_from,
            resend_api_key: optional_var("RESEND_API_KEY"),
            price_api_base: optional_var("PRICE_API_BASE")
                .unwrap_or_else(|| DEFAULT_PRICE_API_BASE.to_string()),
        })
    }

    fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
