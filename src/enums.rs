use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

use crate::error::AppError;

// ─── AlertType ───────────────────────────────────────────────────────

/// What an alert watches: a single token price or a wallet's total value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Price,
    Portfolio,
}

impl AlertType {
    /// Canonical string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Price => "price",
            AlertType::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "price" => Ok(AlertType::Price),
            "portfolio" => Ok(AlertType::Portfolio),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid alert type: {}. Supported: price, portfolio",
                s
            ))),
        }
    }
}

// ─── AlertOperator ───────────────────────────────────────────────────

/// Trigger condition applied to the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertOperator {
    Above,
    Below,
    PercentIncrease,
    PercentDecrease,
}

impl AlertOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertOperator::Above => "above",
            AlertOperator::Below => "below",
            AlertOperator::PercentIncrease => "percent_increase",
            AlertOperator::PercentDecrease => "percent_decrease",
        }
    }

    /// Percent operators only make sense against a token price.
    pub fn is_percent(&self) -> bool {
        matches!(self, AlertOperator::PercentIncrease | AlertOperator::PercentDecrease)
    }
}

impl fmt::Display for AlertOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertOperator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "above" => Ok(AlertOperator::Above),
            "below" => Ok(AlertOperator::Below),
            "percent_increase" => Ok(AlertOperator::PercentIncrease),
            "percent_decrease" => Ok(AlertOperator::PercentDecrease),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid alert operator: {}. Supported: above, below, percent_increase, percent_decrease",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parse_is_case_insensitive() {
        assert_eq!("ABOVE".parse::<AlertOperator>().unwrap(), AlertOperator::Above);
        assert_eq!(
            "Percent_Decrease".parse::<AlertOperator>().unwrap(),
            AlertOperator::PercentDecrease
        );
        assert!("equals".parse::<AlertOperator>().is_err());
    }

    #[test]
    fn test_alert_type_matches_stored_string() {
        for kind in [AlertType::Price, AlertType::Portfolio] {
            assert_eq!(kind.as_str().parse::<AlertType>().unwrap(), kind);
        }
        assert!("volume".parse::<AlertType>().is_err());
    }

    #[test]
    fn test_is_percent() {
        assert!(AlertOperator::PercentIncrease.is_percent());
        assert!(!AlertOperator::Below.is_percent());
    }
}
