//! # mssql-bulk
//!
//! Auto-encoding bulk insert pipeline for SQL Server.
//!
//! Bulk-load transports move bytes, not characters: VARCHAR columns carry
//! collation-specific code pages, and NVARCHAR data can be downgraded to a
//! narrow wire type inside the transport, corrupting anything outside
//! ASCII. This crate resolves each target column's text codec from server
//! metadata and rewrites textual row values into their exact wire bytes
//! before the transport sees them.
//!
//! ## Pipeline
//!
//! 1. [`TableRef::parse`] splits a possibly quoted, possibly multi-part
//!    table name into catalog, schema, and table.
//! 2. [`CodecTable::resolve`] queries `INFORMATION_SCHEMA.COLUMNS` over
//!    the caller's connection and maps every column to a text codec, or to
//!    none for non-text columns.
//! 3. [`EncodedRows`] lazily rewrites each row's textual values as the
//!    transport pulls them.
//!
//! [`bulk_insert_auto_encode`] wires the three stages together over any
//! connection implementing the [`MetadataSource`] and [`BulkDestination`]
//! seams.
//!
//! The pipeline holds no state across calls and performs no retries;
//! concurrent bulk inserts on one connection must be serialized by the
//! caller like any other statement on a single session.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bulk;
pub mod codec;
pub mod encode;
pub mod error;
pub mod metadata;
pub mod row;
pub mod table;

// Re-export commonly used types
pub use bulk::{bulk_insert_auto_encode, BulkDestination, BulkOptions, RowSource};
pub use codec::{CodecTable, ColumnCodec};
pub use encode::EncodedRows;
pub use error::{Error, Result};
pub use metadata::{column_metadata_query, ColumnMetadata, MetadataSource};
pub use mssql_bulk_types::{SqlValue, TypeError};
pub use row::BulkRow;
pub use table::TableRef;
pub use tds_collation::CodePageEncoding;
