//! Qualified table name parsing.

use crate::error::{Error, Result};

/// A parsed `[catalog.][schema.]table` reference.
///
/// Parts are assigned right-to-left: the last segment is always the table,
/// the one before it the schema, the one before that the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    catalog: Option<String>,
    schema: Option<String>,
    name: String,
}

impl TableRef {
    /// Parse a possibly multi-part SQL Server table name.
    ///
    /// Splits on `.` while honoring `[bracketed]` and `"quoted"`
    /// identifiers, in a single left-to-right scan:
    ///
    /// - bracket contents are copied verbatim until the next `]`; brackets
    ///   are not escape-aware, and an unterminated bracket consumes the
    ///   rest of the input without error;
    /// - quote contents are copied verbatim; `""` inside quotes is one
    ///   literal quote character; an unterminated quote likewise keeps
    ///   what was collected;
    /// - dots inside brackets or quotes are literal and never split.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTableName`] when the name splits into more than
    /// three parts.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = input.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '[' => {
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        current.push(c);
                    }
                }
                '"' => {
                    while let Some(c) = chars.next() {
                        if c == '"' {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                current.push('"');
                            } else {
                                break;
                            }
                        } else {
                            current.push(c);
                        }
                    }
                }
                '.' => {
                    parts.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            }
        }
        parts.push(current);

        if parts.len() > 3 {
            return Err(Error::InvalidTableName(input.to_string()));
        }

        let name = parts.pop().unwrap_or_default();
        let schema = parts.pop();
        let catalog = parts.pop();

        Ok(Self {
            catalog,
            schema,
            name,
        })
    }

    /// The catalog (database) part, when the name had three parts.
    #[must_use]
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// The schema part, when the name had at least two parts.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The table part. Always the last segment of the source string.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
