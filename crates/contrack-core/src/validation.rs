use crate::CellValue;
use serde::{Deserialize, Serialize};

/// Validation criteria types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationCriteria {
    /// Dropdown list of fixed values
    List {
        items: Vec<String>,
        #[serde(default = "default_true")]
        show_dropdown: bool,
    },

    /// Any value allowed (essentially disables validation but keeps messages)
    Any,
}

fn default_true() -> bool { true }

/// Alert style when validation fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertStyle {
    /// Prevents invalid entry (default)
    #[default]
    Stop,
    /// Shows warning but allows entry
    Warning,
}

/// Error alert configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ValidationAlert {
    pub style: AlertStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationAlert),
}

/// A data validation rule attached to a cell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataValidationRule {
    pub criteria: ValidationCriteria,
    #[serde(default = "default_true")]
    pub allow_blank: bool,
    #[serde(default)]
    pub error_alert: ValidationAlert,
}

impl DataValidationRule {
    pub fn new(criteria: ValidationCriteria) -> Self {
        Self {
            criteria,
            allow_blank: true,
            error_alert: ValidationAlert::default(),
        }
    }

    /// Dropdown restricted to the given values, rejecting anything else
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ValidationCriteria::List {
            items: items.into_iter().map(Into::into).collect(),
            show_dropdown: true,
        })
    }

    /// Validate a cell value against this rule
    pub fn validate(&self, value: &CellValue) -> ValidationResult {
        if value.is_empty() {
            return if self.allow_blank {
                ValidationResult::Valid
            } else {
                ValidationResult::Invalid(self.error_alert.clone())
            };
        }

        let is_valid = match &self.criteria {
            ValidationCriteria::Any => true,
            ValidationCriteria::List { items, .. } => {
                let text = value.as_text();
                items.iter().any(|item| item == &text)
            }
        };

        if is_valid {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(self.error_alert.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_validation_static() {
        let rule = DataValidationRule::list(["paid", "renew"]);

        assert_eq!(rule.validate(&CellValue::text("paid")), ValidationResult::Valid);
        assert_eq!(rule.validate(&CellValue::text("renew")), ValidationResult::Valid);
        assert!(matches!(rule.validate(&CellValue::text("Paid")), ValidationResult::Invalid(_)));
    }

    #[test]
    fn test_allow_blank() {
        let mut rule = DataValidationRule::list(["paid"]);
        assert_eq!(rule.validate(&CellValue::Empty), ValidationResult::Valid);

        rule.allow_blank = false;
        assert!(matches!(rule.validate(&CellValue::Empty), ValidationResult::Invalid(_)));
    }
}
