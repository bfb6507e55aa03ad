use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{DataValidationRule, ValidationAlert};
use crate::CellValue;

/// Value of a monthly status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthStatus {
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "renew")]
    Renew,
    #[serde(rename = "terminate")]
    Terminate,
    #[serde(rename = "not proceed")]
    NotProceed,
}

impl MonthStatus {
    pub const ALL: [MonthStatus; 4] = [
        MonthStatus::Paid,
        MonthStatus::Renew,
        MonthStatus::Terminate,
        MonthStatus::NotProceed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonthStatus::Paid => "paid",
            MonthStatus::Renew => "renew",
            MonthStatus::Terminate => "terminate",
            MonthStatus::NotProceed => "not proceed",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|s| s.as_str() == text)
    }

    pub fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Text(s) => Self::parse(s),
            _ => None,
        }
    }

    /// The dropdown constraint every monthly cell carries
    pub fn validation_rule() -> DataValidationRule {
        let mut rule = DataValidationRule::list(Self::ALL.iter().map(|s| s.as_str()));
        rule.error_alert = ValidationAlert {
            message: Some("Choose one of: paid, renew, terminate, not proceed".to_string()),
            ..ValidationAlert::default()
        };
        rule
    }
}

impl fmt::Display for MonthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MonthStatus> for CellValue {
    fn from(status: MonthStatus) -> Self {
        CellValue::Text(status.as_str().to_string())
    }
}

/// Per-row renewal decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenewalStatus {
    Renew,
    #[serde(rename = "Not Renewing")]
    NotRenewing,
    Renewed,
    Terminated,
}

impl RenewalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalStatus::Renew => "Renew",
            RenewalStatus::NotRenewing => "Not Renewing",
            RenewalStatus::Renewed => "Renewed",
            RenewalStatus::Terminated => "Terminated",
        }
    }

    /// Parse a status cell; blank or unrecognized text yields `None`
    pub fn from_cell(value: &CellValue) -> Option<Self> {
        match value.as_text().trim() {
            "Renew" => Some(RenewalStatus::Renew),
            "Not Renewing" => Some(RenewalStatus::NotRenewing),
            "Renewed" => Some(RenewalStatus::Renewed),
            "Terminated" => Some(RenewalStatus::Terminated),
            _ => None,
        }
    }
}

impl fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RenewalStatus> for CellValue {
    fn from(status: RenewalStatus) -> Self {
        CellValue::Text(status.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationResult;

    #[test]
    fn test_month_status_text() {
        assert_eq!(MonthStatus::parse("not proceed"), Some(MonthStatus::NotProceed));
        assert_eq!(MonthStatus::parse(" paid "), Some(MonthStatus::Paid));
        assert_eq!(MonthStatus::parse("Paid"), None);
        assert_eq!(CellValue::from(MonthStatus::Renew), CellValue::text("renew"));
    }

    #[test]
    fn test_validation_rule_matches_enumeration() {
        let rule = MonthStatus::validation_rule();
        for status in MonthStatus::ALL {
            assert_eq!(rule.validate(&status.into()), ValidationResult::Valid);
        }
        assert!(matches!(rule.validate(&CellValue::text("late")), ValidationResult::Invalid(_)));
    }

    #[test]
    fn test_renewal_status_from_cell() {
        assert_eq!(RenewalStatus::from_cell(&CellValue::text("Not Renewing")), Some(RenewalStatus::NotRenewing));
        assert_eq!(RenewalStatus::from_cell(&CellValue::Empty), None);
        assert_eq!(RenewalStatus::from_cell(&CellValue::text("maybe")), None);
    }
}
