//! Column metadata retrieval.

use async_trait::async_trait;

use mssql_bulk_types::SqlValue;

use crate::error::Result;
use crate::table::TableRef;

/// One row of `INFORMATION_SCHEMA.COLUMNS` output, in ordinal order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    /// Column name (`COLUMN_NAME`).
    pub name: String,
    /// Declared data type name (`DATA_TYPE`), e.g. `nvarchar`.
    pub data_type: String,
    /// Code page derived from the column's collation, for columns that
    /// have one (`COLLATIONPROPERTY(COLLATION_NAME, 'CodePage')`).
    pub code_page: Option<i32>,
}

/// Query capability against the connection's metadata views.
///
/// The contract is deliberately narrow: execute one parameterized query
/// and return its result rows in order. Parameters are positional and bind
/// to `@p1`, `@p2`, ... in the query text.
///
/// Implementations surface their own transport failures through
/// [`Error::Query`](crate::Error::Query) or [`Error::Io`](crate::Error::Io);
/// the resolver neither wraps nor retries them. The query cursor must be
/// released on every exit path, including failures.
#[async_trait]
pub trait MetadataSource {
    /// Execute `sql` with `params` and return the result rows in order.
    async fn column_metadata(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<ColumnMetadata>>;
}

/// Build the column metadata query for `table`.
///
/// The query always filters on `TABLE_NAME`; `TABLE_SCHEMA` and
/// `TABLE_CATALOG` predicates are added only when the parsed name carries
/// those parts. A catalog part additionally selects which database's
/// `INFORMATION_SCHEMA.COLUMNS` view is queried, bracketed with embedded
/// `]` doubled.
#[must_use]
pub fn column_metadata_query(table: &TableRef) -> (String, Vec<SqlValue>) {
    let view = match table.catalog() {
        Some(catalog) => format!(
            "[{}].INFORMATION_SCHEMA.COLUMNS",
            catalog.replace(']', "]]")
        ),
        None => "INFORMATION_SCHEMA.COLUMNS".to_string(),
    };

    let mut params = vec![SqlValue::String(table.name().to_string())];
    let mut predicates = vec!["TABLE_NAME = @p1".to_string()];

    if let Some(schema) = table.schema() {
        params.push(SqlValue::String(schema.to_string()));
        predicates.push(format!("TABLE_SCHEMA = @p{}", params.len()));
    }
    if let Some(catalog) = table.catalog() {
        params.push(SqlValue::String(catalog.to_string()));
        predicates.push(format!("TABLE_CATALOG = @p{}", params.len()));
    }

    let sql = format!(
        "SELECT COLUMN_NAME, DATA_TYPE, \
         CAST(COLLATIONPROPERTY(COLLATION_NAME, 'CodePage') AS INT) AS CodePage \
         FROM {view} WHERE {} ORDER BY ORDINAL_POSITION",
        predicates.join(" AND ")
    );

    (sql, params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn table_only_query() {
        let table = TableRef::parse("Users").unwrap();
        let (sql, params) = column_metadata_query(&table);

        assert!(sql.starts_with(
            "SELECT COLUMN_NAME, DATA_TYPE, \
             CAST(COLLATIONPROPERTY(COLLATION_NAME, 'CodePage') AS INT) AS CodePage \
             FROM INFORMATION_SCHEMA.COLUMNS"
        ));
        assert!(sql.contains("WHERE TABLE_NAME = @p1 "));
        assert!(!sql.contains("TABLE_SCHEMA"));
        assert!(!sql.contains("TABLE_CATALOG"));
        assert!(sql.ends_with("ORDER BY ORDINAL_POSITION"));
        assert_eq!(params, vec![SqlValue::String("Users".into())]);
    }

    #[test]
    fn schema_adds_predicate() {
        let table = TableRef::parse("dbo.Users").unwrap();
        let (sql, params) = column_metadata_query(&table);

        assert!(sql.contains("TABLE_NAME = @p1 AND TABLE_SCHEMA = @p2"));
        assert!(!sql.contains("TABLE_CATALOG"));
        assert_eq!(
            params,
            vec![
                SqlValue::String("Users".into()),
                SqlValue::String("dbo".into()),
            ]
        );
    }

    #[test]
    fn catalog_qualifies_view_and_adds_predicate() {
        let table = TableRef::parse("Sales.dbo.Users").unwrap();
        let (sql, params) = column_metadata_query(&table);

        assert!(sql.contains("FROM [Sales].INFORMATION_SCHEMA.COLUMNS"));
        assert!(sql.contains(
            "TABLE_NAME = @p1 AND TABLE_SCHEMA = @p2 AND TABLE_CATALOG = @p3"
        ));
        assert_eq!(
            params,
            vec![
                SqlValue::String("Users".into()),
                SqlValue::String("dbo".into()),
                SqlValue::String("Sales".into()),
            ]
        );
    }

    #[test]
    fn catalog_brackets_escape_closing_bracket() {
        let table = TableRef::parse("\"Odd]Name\".dbo.Users").unwrap();
        assert_eq!(table.catalog(), Some("Odd]Name"));

        let (sql, params) = column_metadata_query(&table);
        assert!(sql.contains("FROM [Odd]]Name].INFORMATION_SCHEMA.COLUMNS"));
        // the predicate parameter carries the unescaped catalog
        assert_eq!(params[2], SqlValue::String("Odd]Name".into()));
    }
}
