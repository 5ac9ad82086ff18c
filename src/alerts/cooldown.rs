use chrono::{ DateTime, Duration, Utc };

use crate::error::{ AppError, Result };

pub const DEFAULT_COOLDOWN_MINUTES: i64 = 10;

/// Minimum quiet period after an alert fires before it may fire again.
#[derive(Debug, Clone, Copy)]
pub struct CooldownGuard {
    window: Duration,
}

impl CooldownGuard {
    pub fn new(minutes: i64) -> Result<Self> {
        if minutes < 0 {
            return Err(AppError::Config("Cooldown must not be negative".to_string()));
        }

        let window = Duration::try_minutes(minutes).ok_or_else(||
            AppError::Config(format!("Cooldown of {} minutes is out of range", minutes))
        )?;

        Ok(Self { window })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True iff the alert fired less than one window before `now`.
    /// An alert that never fired is never in cooldown.
    pub fn is_within_cooldown(
        &self,
        last_triggered: Option<DateTime<Utc>>,
        now: DateTime<Utc>
    ) -> bool {
        match last_triggered {
            Some(last) => now.signed_duration_since(last) < self.window,
            None => false,
        }
    }
}

impl Default for CooldownGuard {
    fn default() -> Self {
        Self {
            window: Duration::minutes(DEFAULT_COOLDOWN_MINUTES),
        }
    }
}
