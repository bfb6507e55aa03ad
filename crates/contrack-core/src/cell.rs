use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::CellFormat;
use crate::month::{parse_date_text, serial_to_date};
use crate::validation::DataValidationRule;

/// Represents the raw value stored in a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Check if the value is empty (blank text counts as empty)
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Try to interpret the value as a calendar date.
    ///
    /// Numbers are treated as day-count serials, which is what the host
    /// reports as the previous value of a date-formatted cell.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Number(n) => serial_to_date(*n),
            CellValue::Text(s) => parse_date_text(s),
            CellValue::Empty => None,
        }
    }
}

impl From<NaiveDate> for CellValue {
    fn from(date: NaiveDate) -> Self {
        CellValue::Date(date)
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

/// Complete cell data structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub format: CellFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<DataValidationRule>,
}

/// Parse user input into a cell value, the way a typed entry lands in the grid
pub fn parse_cell_input(input: &str) -> CellValue {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return CellValue::Empty;
    }

    if let Ok(num) = trimmed.parse::<f64>() {
        return CellValue::Number(num);
    }

    if let Some(date) = parse_date_text(trimmed) {
        return CellValue::Date(date);
    }

    CellValue::Text(trimmed.to_string())
}
