//! Contract lifecycle logic over a [`contrack_core::SheetStore`]: the rolling
//! month grid, edit-triggered date handling, renewal sync and batch jobs.

mod contract;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod jobs;
pub mod mail;
pub mod prompt;
pub mod renewal;
pub mod rows;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use dispatch::{EditEvent, EditOutcome};
pub use error::TrackerError;
pub use grid::MonthGrid;
pub use jobs::{Job, JobReport, UnknownJob};
pub use mail::{LogMailer, MailError, Mailer, OutgoingEmail};
pub use prompt::{Prompt, ScriptedPrompt};
pub use renewal::RenewalReport;
pub use rows::TrackerRow;
pub use tracker::Tracker;
