//! Table interaction errors

/// Errors raised by invalid interactions with a table view model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The column is not part of the active field set.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A drag was started while drag and drop is disabled.
    #[error("Drag and drop is disabled for this table")]
    DragDisabled,

    /// A drop arrived without a preceding drag start.
    #[error("No drag in progress")]
    NoDragInProgress,

    /// A row position does not exist in the current row order.
    #[error("Row position {position} out of range for {len} rows")]
    PositionOutOfRange { position: usize, len: usize },
}

impl TableError {
    /// Creates a new out of range error.
    pub fn out_of_range(position: usize, len: usize) -> Self {
        Self::PositionOutOfRange { position, len }
    }
}
