//! Auto-encoded bulk insert orchestration.
//!
//! [`bulk_insert_auto_encode`] wires the three pipeline stages together:
//! parse the qualified table name, resolve per-column text codecs over the
//! caller's connection, then hand the lazily encoded row stream to the
//! connection's bulk-load transport.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mssql_bulk::{bulk_insert_auto_encode, BulkOptions, BulkRow, SqlValue};
//!
//! let rows: Vec<BulkRow> = customers
//!     .into_iter()
//!     .map(|c| BulkRow::Positional(vec![SqlValue::Int(c.id), SqlValue::String(c.name)]))
//!     .collect();
//!
//! let inserted = bulk_insert_auto_encode(
//!     &mut connection,
//!     "[Sales].dbo.Customers",
//!     rows,
//!     BulkOptions::default().table_lock(true),
//! )
//! .await?;
//! ```

use async_trait::async_trait;

use crate::codec::CodecTable;
use crate::encode::EncodedRows;
use crate::error::Result;
use crate::metadata::MetadataSource;
use crate::row::BulkRow;
use crate::table::TableRef;

/// Options controlling bulk insert behavior.
///
/// These map to SQL Server's bulk-load hints. The pipeline itself never
/// reads them; they reach the destination unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOptions {
    /// Number of rows per batch commit.
    ///
    /// Smaller batches use less memory but have more overhead.
    /// Default: 0 (single batch for the entire operation).
    pub batch_size: usize,

    /// Check constraints during insert.
    ///
    /// Default: true
    pub check_constraints: bool,

    /// Fire INSERT triggers on the table.
    ///
    /// Default: false (better performance)
    pub fire_triggers: bool,

    /// Keep NULL values instead of using column defaults.
    ///
    /// Default: true
    pub keep_nulls: bool,

    /// Acquire a table-level lock for the duration of the operation.
    ///
    /// Default: false
    pub table_lock: bool,

    /// Order hint for data pre-sorted by the clustered index.
    ///
    /// Default: None
    pub order_hint: Option<Vec<String>>,

    /// Maximum errors allowed before aborting.
    ///
    /// Default: 0 (abort on first error)
    pub max_errors: u32,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            batch_size: 0,
            check_constraints: true,
            fire_triggers: false,
            keep_nulls: true,
            table_lock: false,
            order_hint: None,
            max_errors: 0,
        }
    }
}

impl BulkOptions {
    /// Set the batch size.
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Enable or disable table lock.
    #[must_use]
    pub fn table_lock(mut self, enabled: bool) -> Self {
        self.table_lock = enabled;
        self
    }

    /// Enable or disable trigger firing.
    #[must_use]
    pub fn fire_triggers(mut self, enabled: bool) -> Self {
        self.fire_triggers = enabled;
        self
    }
}

/// Lazy row stream handed to the bulk-load destination.
pub type RowSource<'a> = &'a mut (dyn Iterator<Item = Result<BulkRow>> + Send);

/// Downstream bulk-load primitive.
///
/// Implementations stream `rows` into `table` and return the inserted-row
/// count. Rows arrive pre-encoded: [`SqlValue::EncodedText`] payloads are
/// already in final wire byte form and must be sent as-is, never
/// re-encoded or reinterpreted as text.
///
/// [`SqlValue::EncodedText`]: mssql_bulk_types::SqlValue::EncodedText
#[async_trait]
pub trait BulkDestination {
    /// Bulk-load `rows` into `table` with `options`.
    async fn bulk_load(
        &mut self,
        table: &str,
        rows: RowSource<'_>,
        options: &BulkOptions,
    ) -> Result<u64>;
}

/// Bulk-insert `rows` into `table`, encoding textual values to match the
/// table's column types and collations.
///
/// Steps: parse the qualified table name, resolve per-column codecs with a
/// metadata query on `connection`, wrap the rows in the lazy encoder, and
/// delegate to the connection's bulk-load transport. The caller-supplied
/// `table` string and `options` reach the transport unmodified, and the
/// transport's row count is returned unchanged.
///
/// Rows may be positional or named, one shape per call. The row source is
/// consumed lazily, one row at a time, only while the transport pulls it.
///
/// # Errors
///
/// [`Error::InvalidTableName`] and [`Error::UnknownColumns`] abort before
/// any row is consumed or sent. Encoding failures surface through the row
/// stream while the transport drains it, per row. Transport failures
/// propagate unchanged. Nothing is retried at this level.
///
/// [`Error::InvalidTableName`]: crate::Error::InvalidTableName
/// [`Error::UnknownColumns`]: crate::Error::UnknownColumns
pub async fn bulk_insert_auto_encode<C, I>(
    connection: &mut C,
    table: &str,
    rows: I,
    options: BulkOptions,
) -> Result<u64>
where
    C: MetadataSource + BulkDestination + Send,
    I: IntoIterator<Item = BulkRow>,
    I::IntoIter: Send,
{
    let parsed = TableRef::parse(table)?;
    let codecs = CodecTable::resolve(connection, table, &parsed).await?;

    let mut encoded = EncodedRows::new(rows.into_iter(), codecs);
    let inserted = connection.bulk_load(table, &mut encoded, &options).await?;
    tracing::debug!(table, rows = inserted, "bulk insert complete");
    Ok(inserted)
}
