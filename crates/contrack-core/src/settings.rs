use serde::{Deserialize, Serialize};

/// Names of the sheets the tracker works with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub form_responses: String,
    pub tracker: String,
    pub archive: String,
    pub renewal_log: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            form_responses: "Form Responses".to_string(),
            tracker: "Tracker".to_string(),
            archive: "Archive".to_string(),
            renewal_log: "Renewal Status".to_string(),
        }
    }
}

/// Semantic fields of a tracker row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerField {
    Sequence,
    Company,
    Location,
    Email,
    PilotNumber,
    RenewalStatus,
    ContractStart,
    ContractEnd,
}

impl TrackerField {
    pub const ALL: [TrackerField; 8] = [
        TrackerField::Sequence,
        TrackerField::Company,
        TrackerField::Location,
        TrackerField::Email,
        TrackerField::PilotNumber,
        TrackerField::RenewalStatus,
        TrackerField::ContractStart,
        TrackerField::ContractEnd,
    ];

    /// Header text shown above the column
    pub fn title(&self) -> &'static str {
        match self {
            TrackerField::Sequence => "No.",
            TrackerField::Company => "Company Name",
            TrackerField::Location => "Location",
            TrackerField::Email => "Email",
            TrackerField::PilotNumber => "Pilot Number",
            TrackerField::RenewalStatus => "Renewal Status",
            TrackerField::ContractStart => "Contract Start",
            TrackerField::ContractEnd => "Contract End",
        }
    }
}

/// Column table for the tracker sheet (0-indexed columns and rows)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSchema {
    pub sequence: u32,
    pub company: u32,
    pub location: u32,
    pub email: u32,
    pub pilot_number: u32,
    pub renewal_status: u32,
    pub contract_start: u32,
    pub contract_end: u32,
    /// Column of the first month in the rolling grid
    pub first_month_col: u32,
    /// Header row holding the year, stamped on January columns only
    pub year_row: u32,
    /// Header row holding `Mmm-YYYY` month labels
    pub month_row: u32,
}

impl Default for TrackerSchema {
    fn default() -> Self {
        Self {
            sequence: 0,
            company: 1,
            location: 2,
            email: 3,
            pilot_number: 4,
            renewal_status: 5,
            contract_start: 6,
            contract_end: 7,
            first_month_col: 8,
            year_row: 0,
            month_row: 1,
        }
    }
}

impl TrackerSchema {
    /// Column holding a field
    pub fn column(&self, field: TrackerField) -> u32 {
        match field {
            TrackerField::Sequence => self.sequence,
            TrackerField::Company => self.company,
            TrackerField::Location => self.location,
            TrackerField::Email => self.email,
            TrackerField::PilotNumber => self.pilot_number,
            TrackerField::RenewalStatus => self.renewal_status,
            TrackerField::ContractStart => self.contract_start,
            TrackerField::ContractEnd => self.contract_end,
        }
    }

    /// Field stored in a column, if any
    pub fn field_at(&self, col: u32) -> Option<TrackerField> {
        TrackerField::ALL
            .into_iter()
            .find(|field| self.column(*field) == col)
    }

    /// First row below the header band
    pub fn first_data_row(&self) -> u32 {
        self.year_row.max(self.month_row) + 1
    }

    pub fn is_header_row(&self, row: u32) -> bool {
        row < self.first_data_row()
    }
}

/// Column table for the form responses sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSchema {
    pub header_rows: u32,
    pub timestamp: u32,
    pub company: u32,
    pub location: u32,
    pub email: u32,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            header_rows: 1,
            timestamp: 0,
            company: 1,
            location: 2,
            email: 3,
        }
    }
}

/// Everything configurable about a tracker workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub sheets: SheetNames,
    pub tracker: TrackerSchema,
    pub form: FormSchema,
    /// Header rows at the top of the archive sheet
    pub archive_header_rows: u32,
    /// Days before contract end on which a reminder email goes out
    pub reminder_days: Vec<i64>,
    /// Display name used on outgoing emails
    pub sender_name: String,
    /// Maximum entries listed in a lapsed-contract alert
    pub lapsed_report_limit: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            sheets: SheetNames::default(),
            tracker: TrackerSchema::default(),
            form: FormSchema::default(),
            archive_header_rows: 1,
            reminder_days: vec![60, 30, 7],
            sender_name: "Contract Desk".to_string(),
            lapsed_report_limit: 20,
        }
    }
}

impl TrackerSettings {
    /// Load settings from JSON; missing keys fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
