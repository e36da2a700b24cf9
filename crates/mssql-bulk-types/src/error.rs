//! Type conversion error types.

use thiserror::Error;

/// Errors that can occur while converting values to their wire form.
#[derive(Debug, Error)]
pub enum TypeError {
    /// Invalid encoding in string data.
    #[error("invalid string encoding: {0}")]
    InvalidEncoding(String),
}
