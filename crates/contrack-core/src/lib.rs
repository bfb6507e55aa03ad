pub mod cell;
pub mod error;
pub mod format;
pub mod month;
pub mod range;
pub mod settings;
pub mod sheet;
pub mod status;
pub mod store;
pub mod validation;
pub mod workbook;

pub use cell::{parse_cell_input, Cell, CellValue};
pub use error::StoreError;
pub use format::{CellFormat, Color};
pub use month::MonthLabel;
pub use range::{col_to_label, CellCoord, CellRange};
pub use settings::{FormSchema, SheetNames, TrackerField, TrackerSchema, TrackerSettings};
pub use sheet::Sheet;
pub use status::{MonthStatus, RenewalStatus};
pub use store::SheetStore;
pub use validation::{AlertStyle, DataValidationRule, ValidationAlert, ValidationCriteria, ValidationResult};
pub use workbook::Workbook;
