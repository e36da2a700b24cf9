//! # mssql-bulk-types
//!
//! Value model shared by the bulk-load encoding pipeline.
//!
//! Rows handed to a bulk load are sequences of [`SqlValue`]s. The pipeline
//! rewrites textual values ([`SqlValue::String`]) into pre-encoded byte
//! payloads ([`SqlValue::EncodedText`]); every other variant travels to the
//! transport untouched.
//!
//! Date/time, GUID, and decimal variants are feature-gated (`chrono`,
//! `uuid`, `decimal`) so downstream crates only pull the conversions they
//! need.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod value;

pub use error::TypeError;
pub use value::SqlValue;
