//! Bulk pipeline error types.

use thiserror::Error;

use mssql_bulk_types::TypeError;

/// Errors that can occur while preparing or running an auto-encoded bulk
/// insert.
#[derive(Debug, Error)]
pub enum Error {
    /// Table name does not decompose into `[catalog.][schema.]table`.
    #[error("invalid table name {0:?}: expected [catalog.][schema.]table")]
    InvalidTableName(String),

    /// The metadata query returned no columns for the target table.
    #[error(
        "no columns found for table {table:?} in INFORMATION_SCHEMA.COLUMNS; \
         verify the table exists and the current user has access \
         (temporary tables cannot be resolved through INFORMATION_SCHEMA)"
    )]
    UnknownColumns {
        /// The table name as supplied by the caller.
        table: String,
    },

    /// Value conversion failed while encoding a row.
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    /// The metadata query or bulk-load transport reported a failure.
    #[error("query error: {0}")]
    Query(String),

    /// IO error from the underlying connection.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bulk pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
