pub mod command;
pub mod proposal;

pub use command::{ClearRangeCommand, Command, CommandBox, CompositeCommand, SetCellCommand};
pub use proposal::Proposal;
