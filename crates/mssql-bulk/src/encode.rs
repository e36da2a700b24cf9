//! Lazy row encoding.
//!
//! [`EncodedRows`] wraps an input row iterator and rewrites textual values
//! into their wire byte form using a resolved [`CodecTable`]. The adapter
//! is pull-based and buffers nothing: consuming one output row consumes
//! exactly one input row, so callers can interleave it with progress
//! counters or other lazy sources.

use bytes::{BufMut, Bytes, BytesMut};

use mssql_bulk_types::{SqlValue, TypeError};

use crate::codec::{CodecTable, ColumnCodec};
use crate::error::{Error, Result};
use crate::row::BulkRow;

impl CodecTable {
    /// Encode one row, rewriting textual values that have a resolved
    /// codec into [`SqlValue::EncodedText`].
    ///
    /// A value passes through untouched when it is not a string, its
    /// position lies beyond the column metadata, its column name is
    /// unknown, or its column has no codec. NULLs are never encoded.
    ///
    /// # Errors
    ///
    /// [`Error::Type`] when a string cannot be represented in its
    /// column's code page; the rest of the row is abandoned.
    pub fn encode_row(&self, row: BulkRow) -> Result<BulkRow> {
        match row {
            BulkRow::Positional(values) => {
                let mut encoded = Vec::with_capacity(values.len());
                for (position, value) in values.into_iter().enumerate() {
                    encoded.push(encode_value(self.codec_at(position), value)?);
                }
                Ok(BulkRow::Positional(encoded))
            }
            BulkRow::Named(values) => {
                let mut encoded = Vec::with_capacity(values.len());
                for (name, value) in values {
                    let codec = self.codec_for(&name);
                    encoded.push((name, encode_value(codec, value)?));
                }
                Ok(BulkRow::Named(encoded))
            }
        }
    }
}

fn encode_value(codec: Option<ColumnCodec>, value: SqlValue) -> Result<SqlValue> {
    match (codec, value) {
        (Some(codec), SqlValue::String(text)) => {
            Ok(SqlValue::EncodedText(encode_text(codec, &text)?))
        }
        (_, value) => Ok(value),
    }
}

/// Encode text with the codec's byte rules.
///
/// Wide columns become UTF-16LE code units; narrow columns use the
/// collation code page. Both come out in the same pre-encoded wrapper:
/// bulk transports may downgrade wide columns to a narrow wire type, and
/// pre-encoded bytes survive that downgrade where unwrapped wide text
/// would be corrupted.
fn encode_text(codec: ColumnCodec, text: &str) -> Result<Bytes> {
    match codec {
        ColumnCodec::Utf16Le => {
            let mut buf = BytesMut::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                buf.put_u16_le(unit);
            }
            Ok(buf.freeze())
        }
        ColumnCodec::CodePage(encoding) => match encoding.encode(text) {
            Some(bytes) => Ok(Bytes::from(bytes)),
            None => Err(Error::Type(TypeError::InvalidEncoding(format!(
                "text is not representable in {}",
                encoding.name()
            )))),
        },
    }
}

/// Iterator adapter that encodes textual values row by row.
///
/// Yields exactly one output row per input row, in input order. Rebuild
/// the adapter to restart; it holds no buffered state.
pub struct EncodedRows<I> {
    rows: I,
    codecs: CodecTable,
}

impl<I> EncodedRows<I>
where
    I: Iterator<Item = BulkRow>,
{
    /// Wrap `rows`, encoding each with `codecs` as it is pulled.
    pub fn new(rows: I, codecs: CodecTable) -> Self {
        Self { rows, codecs }
    }
}

impl<I> Iterator for EncodedRows<I>
where
    I: Iterator<Item = BulkRow>,
{
    type Item = Result<BulkRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| self.codecs.encode_row(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::metadata::ColumnMetadata;

    fn column(name: &str, data_type: &str, code_page: Option<i32>) -> ColumnMetadata {
        ColumnMetadata {
            name: name.to_string(),
            data_type: data_type.to_string(),
            code_page,
        }
    }

    /// id INT, name NVARCHAR, notes VARCHAR (cp1252)
    fn codecs() -> CodecTable {
        CodecTable::from_columns(vec![
            column("id", "int", None),
            column("name", "nvarchar", None),
            column("notes", "varchar", Some(1252)),
        ])
    }

    #[test]
    fn positional_row_encodes_textual_columns() {
        let row = BulkRow::Positional(vec![
            SqlValue::Int(1),
            SqlValue::String("ホ".into()),
            SqlValue::String("½".into()),
        ]);

        let encoded = codecs().encode_row(row).unwrap();
        assert_eq!(
            encoded,
            BulkRow::Positional(vec![
                SqlValue::Int(1),
                SqlValue::EncodedText(Bytes::from_static(&[0xDB, 0x30])),
                SqlValue::EncodedText(Bytes::from_static(&[0xBD])),
            ])
        );
    }

    #[test]
    fn wide_column_bytes_are_little_endian() {
        let row = BulkRow::Positional(vec![SqlValue::Null, SqlValue::String("½".into())]);

        let encoded = codecs().encode_row(row).unwrap();
        assert_eq!(
            encoded,
            BulkRow::Positional(vec![
                SqlValue::Null,
                SqlValue::EncodedText(Bytes::from_static(&[0xBD, 0x00])),
            ])
        );
    }

    #[test]
    fn named_row_encodes_by_column_name() {
        let row = BulkRow::Named(vec![
            ("notes".to_string(), SqlValue::String("café".into())),
            ("id".to_string(), SqlValue::Int(7)),
        ]);

        let encoded = codecs().encode_row(row).unwrap();
        assert_eq!(
            encoded,
            BulkRow::Named(vec![
                (
                    "notes".to_string(),
                    SqlValue::EncodedText(Bytes::from_static(&[0x63, 0x61, 0x66, 0xE9])),
                ),
                ("id".to_string(), SqlValue::Int(7)),
            ])
        );
    }

    #[test]
    fn unknown_column_name_passes_through() {
        let row = BulkRow::Named(vec![(
            "not_a_column".to_string(),
            SqlValue::String("text".into()),
        )]);

        let encoded = codecs().encode_row(row).unwrap();
        assert_eq!(
            encoded,
            BulkRow::Named(vec![(
                "not_a_column".to_string(),
                SqlValue::String("text".into()),
            )])
        );
    }

    #[test]
    fn null_in_textual_column_passes_through() {
        let row = BulkRow::Positional(vec![SqlValue::Int(1), SqlValue::Null, SqlValue::Null]);
        let encoded = codecs().encode_row(row.clone()).unwrap();
        assert_eq!(encoded, row);
    }

    #[test]
    fn value_past_column_metadata_passes_through() {
        // four values against three columns of metadata
        let row = BulkRow::Positional(vec![
            SqlValue::Int(1),
            SqlValue::Null,
            SqlValue::Null,
            SqlValue::String("extra".into()),
        ]);

        let encoded = codecs().encode_row(row.clone()).unwrap();
        assert_eq!(encoded, row);
    }

    #[test]
    fn non_textual_values_are_never_touched() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let row = BulkRow::Positional(vec![
            SqlValue::Binary(Bytes::from_static(b"\x01\x02")),
            SqlValue::Date(date),
            SqlValue::Double(0.5),
        ]);

        let encoded = codecs().encode_row(row.clone()).unwrap();
        assert_eq!(encoded, row);
    }

    #[test]
    fn unrepresentable_text_fails_the_row() {
        let row = BulkRow::Positional(vec![
            SqlValue::Int(1),
            SqlValue::Null,
            SqlValue::String("日本語".into()),
        ]);

        let err = codecs().encode_row(row).unwrap_err();
        assert!(matches!(err, Error::Type(TypeError::InvalidEncoding(_))));
        assert!(err.to_string().contains("windows-1252"));
    }

    #[test]
    fn yields_one_output_per_input_in_order() {
        let rows: Vec<BulkRow> = (0..5)
            .map(|i| BulkRow::Positional(vec![SqlValue::Int(i)]))
            .collect();

        let encoded: Vec<BulkRow> = EncodedRows::new(rows.clone().into_iter(), codecs())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(encoded, rows);
    }

    #[test]
    fn pulls_exactly_one_input_row_per_output_row() {
        use std::cell::Cell;
        use std::rc::Rc;

        let pulled = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&pulled);
        let rows = (0..10).map(move |i| {
            counter.set(counter.get() + 1);
            BulkRow::Positional(vec![SqlValue::Int(i)])
        });

        let mut encoded = EncodedRows::new(rows, codecs());
        assert_eq!(pulled.get(), 0);

        encoded.next().unwrap().unwrap();
        assert_eq!(pulled.get(), 1);

        encoded.next().unwrap().unwrap();
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn size_hint_tracks_the_input() {
        let rows: Vec<BulkRow> = (0..4)
            .map(|i| BulkRow::Positional(vec![SqlValue::Int(i)]))
            .collect();

        let encoded = EncodedRows::new(rows.into_iter(), codecs());
        assert_eq!(encoded.size_hint(), (4, Some(4)));
    }
}
