use contrack_core::{CellCoord, SheetStore, StoreError};

use crate::command::{Command, CompositeCommand, SetCellCommand};

/// A destructive change waiting on a yes/no answer.
///
/// `edit` is the write the host already made, so its inverse is known
/// before anyone is asked. `change` is what confirming applies on top.
#[derive(Debug)]
pub struct Proposal {
    edit: SetCellCommand,
    change: CompositeCommand,
    message: String,
}

impl Proposal {
    pub fn new(edit: SetCellCommand, change: CompositeCommand, message: impl Into<String>) -> Self {
        Self {
            edit,
            change,
            message: message.into(),
        }
    }

    /// Question to put to the user
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Apply the pending change
    pub fn confirm(mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        self.change.execute(store)
    }

    /// Roll the host's edit back; nothing else is touched
    pub fn reject(mut self, store: &mut dyn SheetStore) -> Result<Vec<CellCoord>, StoreError> {
        self.edit.undo(store)
    }
}
