//! Column codec resolution from table metadata.

use std::collections::HashMap;

use tds_collation::CodePageEncoding;

use crate::error::{Error, Result};
use crate::metadata::{column_metadata_query, ColumnMetadata, MetadataSource};
use crate::table::TableRef;

/// Text codec for one column of the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCodec {
    /// Wide (national) character column; encoded as UTF-16LE.
    Utf16Le,
    /// Narrow character column; encoded with the collation's code page.
    CodePage(CodePageEncoding),
}

/// Per-column codecs for one target table, keyed both by ordinal position
/// and by column name.
///
/// Both views come out of a single metadata pass and agree pairwise. A
/// `None` entry marks a column whose values pass through unencoded: a
/// non-text type, a column without a collation code page, or a code page
/// the fixed mapping does not carry. The last case lets raw text reach a
/// byte-oriented wire path unconverted, which is the same behavior callers
/// get without auto-encoding; it is passed through rather than rejected.
///
/// Built once per bulk insert, read-only afterwards, never cached across
/// calls.
#[derive(Debug, Clone)]
pub struct CodecTable {
    by_position: Vec<Option<ColumnCodec>>,
    by_name: HashMap<String, Option<ColumnCodec>>,
}

impl CodecTable {
    /// Resolve codecs for `table` by querying `INFORMATION_SCHEMA.COLUMNS`
    /// through `source`.
    ///
    /// `table` is the caller-supplied name, used in error messages;
    /// `parsed` is its parsed form, used to scope the query.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumns`] when the query returns no rows: the table
    /// does not exist, the current user cannot see it, or it is a
    /// session-scoped temporary table (those are not visible through
    /// `INFORMATION_SCHEMA`). Transport failures from `source` propagate
    /// unchanged.
    pub async fn resolve<M>(source: &mut M, table: &str, parsed: &TableRef) -> Result<Self>
    where
        M: MetadataSource + Send + ?Sized,
    {
        let (sql, params) = column_metadata_query(parsed);
        tracing::debug!(table, "resolving column codecs");

        let columns = source.column_metadata(&sql, &params).await?;
        if columns.is_empty() {
            return Err(Error::UnknownColumns {
                table: table.to_string(),
            });
        }

        let codecs = Self::from_columns(columns);
        tracing::debug!(table, columns = codecs.len(), "column codecs resolved");
        Ok(codecs)
    }

    /// Build the paired position/name views from metadata rows.
    ///
    /// Rows must already be in ordinal order; the metadata query orders by
    /// `ORDINAL_POSITION`.
    #[must_use]
    pub fn from_columns(columns: Vec<ColumnMetadata>) -> Self {
        let mut by_position = Vec::with_capacity(columns.len());
        let mut by_name = HashMap::with_capacity(columns.len());

        for column in columns {
            let codec = classify(&column.data_type, column.code_page);
            by_position.push(codec);
            by_name.insert(column.name, codec);
        }

        Self {
            by_position,
            by_name,
        }
    }

    /// Number of columns the metadata reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    /// Whether the table has no resolved columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Codec for the column at a 0-based ordinal position.
    ///
    /// Positions past the end of the metadata have no codec.
    #[must_use]
    pub fn codec_at(&self, position: usize) -> Option<ColumnCodec> {
        self.by_position.get(position).copied().flatten()
    }

    /// Codec for a column by name. Unknown names have no codec.
    #[must_use]
    pub fn codec_for(&self, name: &str) -> Option<ColumnCodec> {
        self.by_name.get(name).copied().flatten()
    }
}

/// Classify one column into its text codec.
///
/// Wide character types always encode as UTF-16LE. Narrow character types
/// use the collation code page when the fixed table knows it. Everything
/// else, including narrow columns with an unknown or absent code page,
/// gets no codec.
fn classify(data_type: &str, code_page: Option<i32>) -> Option<ColumnCodec> {
    if data_type.eq_ignore_ascii_case("nvarchar")
        || data_type.eq_ignore_ascii_case("nchar")
        || data_type.eq_ignore_ascii_case("ntext")
    {
        return Some(ColumnCodec::Utf16Le);
    }

    if data_type.eq_ignore_ascii_case("varchar")
        || data_type.eq_ignore_ascii_case("char")
        || data_type.eq_ignore_ascii_case("text")
    {
        return code_page
            .and_then(|cp| u16::try_from(cp).ok())
            .and_then(CodePageEncoding::for_code_page)
            .map(ColumnCodec::CodePage);
    }

    None
}
