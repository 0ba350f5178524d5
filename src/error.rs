use crate::table::RowId;
use thiserror::Error;

/// Failures reported by `TableEngine::settle_delete`. A delete requested
/// without an `on_delete` handler is refused up front and never gets here.
#[derive(Debug, Error)]
pub enum TableError {
    /// The handler returned an error or panicked; the row is kept.
    #[error("deleting row {row} failed: {source}")]
    DeleteFailed {
        row: RowId,
        #[source]
        source: anyhow::Error,
    },

    /// The outcome names a row that is not the one being confirmed.
    #[error("settled delete for row {0} does not match the pending delete")]
    UnexpectedSettle(RowId),
}
