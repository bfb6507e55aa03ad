use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::CellValue;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Text formats accepted when a date arrives as a string
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y", "%b %d, %Y", "%d %B %Y"];

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]{3})-(\d{4})$").expect("valid month label pattern"))
}

/// A calendar month as it appears in the month-label header row (`Mar-2026`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthLabel {
    year: i32,
    month: u32,
}

impl MonthLabel {
    /// Create a label; `month` is 1-based
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether this is a January column (the year row is stamped only there)
    pub fn is_january(&self) -> bool {
        self.month == 1
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MAX)
    }

    /// The following calendar month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: MonthLabel) -> i32 {
        (other.year - self.year) * 12 + other.month as i32 - self.month as i32
    }

    /// Consecutive months starting at `self`
    pub fn iter(self) -> impl Iterator<Item = MonthLabel> {
        std::iter::successors(Some(self), |m| Some(m.next()))
    }

    /// Months from `self` through `end` inclusive (empty when `end` is earlier)
    pub fn through(self, end: MonthLabel) -> impl Iterator<Item = MonthLabel> {
        self.iter().take_while(move |m| *m <= end)
    }

    /// Read a header cell. Text must match the label token; a date-typed
    /// header is reformatted to the month it falls in.
    pub fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Date(d) => Some(Self::of(*d)),
            _ => None,
        }
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbr = MONTH_ABBREVIATIONS[(self.month - 1) as usize];
        write!(f, "{}-{:04}", abbr, self.year)
    }
}

impl FromStr for MonthLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = label_pattern()
            .captures(s)
            .ok_or_else(|| format!("not a month label: {s:?}"))?;
        let abbr = &caps[1];
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(abbr))
            .ok_or_else(|| format!("unknown month abbreviation: {abbr:?}"))?;
        let year: i32 = caps[2].parse().map_err(|_| format!("bad year in {s:?}"))?;
        Ok(Self { year, month: month as u32 + 1 })
    }
}

impl TryFrom<String> for MonthLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthLabel> for String {
    fn from(label: MonthLabel) -> Self {
        label.to_string()
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Calendar month addition; the day is clamped to the target month's length
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// End of a twelve-month term beginning in the month of `start`:
/// first-of-month plus twelve months, minus one day.
pub fn term_end_from_start(start: NaiveDate) -> NaiveDate {
    add_months(first_of_month(start), 12)
        .pred_opt()
        .unwrap_or(NaiveDate::MAX)
}

/// Day zero of the host's date serial numbers
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Decode a day-count serial into a calendar date (time fraction dropped)
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    serial_epoch().checked_add_days(Days::new(serial.floor() as u64))
}

/// Parse a date typed as text
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_label_display_and_parse() {
        let label = MonthLabel::new(2026, 3).unwrap();
        assert_eq!(label.to_string(), "Mar-2026");
        assert_eq!("Mar-2026".parse::<MonthLabel>(), Ok(label));
        assert_eq!("mar-2026".parse::<MonthLabel>(), Ok(label));
        assert!("March-2026".parse::<MonthLabel>().is_err());
        assert!("Mar-26".parse::<MonthLabel>().is_err());
        assert!(MonthLabel::new(2026, 13).is_none());
    }

    #[test]
    fn test_label_from_date_cell() {
        let cell = CellValue::Date(ymd(2025, 12, 1));
        assert_eq!(MonthLabel::from_cell(&cell), MonthLabel::new(2025, 12));
        assert_eq!(MonthLabel::from_cell(&CellValue::Number(3.0)), None);
    }

    #[test]
    fn test_next_and_through() {
        let dec = MonthLabel::new(2025, 12).unwrap();
        assert_eq!(dec.next(), MonthLabel::new(2026, 1).unwrap());

        let months: Vec<String> = dec
            .through(MonthLabel::new(2026, 2).unwrap())
            .map(|m| m.to_string())
            .collect();
        assert_eq!(months, ["Dec-2025", "Jan-2026", "Feb-2026"]);
        assert_eq!(dec.through(MonthLabel::new(2025, 1).unwrap()).count(), 0);
        assert_eq!(dec.months_until(MonthLabel::new(2026, 3).unwrap()), 3);
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(first_of_month(ymd(2026, 3, 17)), ymd(2026, 3, 1));
        assert_eq!(last_of_month(ymd(2024, 2, 3)), ymd(2024, 2, 29));
        assert_eq!(last_of_month(ymd(2025, 12, 31)), ymd(2025, 12, 31));
    }

    #[test]
    fn test_term_end_from_start() {
        assert_eq!(term_end_from_start(ymd(2026, 3, 17)), ymd(2027, 2, 28));
        assert_eq!(term_end_from_start(ymd(2026, 1, 1)), ymd(2026, 12, 31));
    }

    #[test]
    fn test_add_months_same_day() {
        assert_eq!(add_months(ymd(2026, 4, 30), 12), ymd(2027, 4, 30));
        assert_eq!(add_months(ymd(2024, 2, 29), 12), ymd(2025, 2, 28));
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(serial_to_date(0.0), Some(ymd(1899, 12, 30)));
        assert_eq!(serial_to_date(45658.75), Some(ymd(2025, 1, 1)));
        assert_eq!(serial_to_date(-1.0), None);
    }

    #[test]
    fn test_parse_date_text() {
        assert_eq!(parse_date_text("2026-03-15"), Some(ymd(2026, 3, 15)));
        assert_eq!(parse_date_text("3/15/2026"), Some(ymd(2026, 3, 15)));
        assert_eq!(parse_date_text("Mar 15, 2026"), Some(ymd(2026, 3, 15)));
        assert_eq!(parse_date_text("soon"), None);
    }
}
