use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::TableError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a contacts row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, mirroring the storage classes of a SQL cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an integer, parsing numeric text the way SQLite does.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Bool(b) => Some(i64::from(*b)),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Name of the storage class, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::String(_) => "string",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Bool(_) => "bool",
            CellValue::Null => "null",
        }
    }
}

// ---------------------------------------------------------------------------
// ContactQuery – the projection every contacts table is normalised to
// ---------------------------------------------------------------------------

/// Column ids of the contacts query.
pub struct ContactQuery;

impl ContactQuery {
    pub const CONTACT_ID: usize = 0;
    pub const DISPLAY_NAME: usize = 1;
    pub const PHOTO_ID: usize = 2;
    pub const LOOKUP_KEY: usize = 3;
    pub const ACCOUNT_TYPE: usize = 4;
    pub const ACCOUNT_NAME: usize = 5;
    pub const DATA_SET: usize = 6;

    pub const PROJECTION: [&'static str; 7] = [
        "contact_id",
        "display_name",
        "photo_id",
        "lookup",
        "account_type",
        "account_name",
        "data_set",
    ];
}

// ---------------------------------------------------------------------------
// ContactTable – a fully materialised result set
// ---------------------------------------------------------------------------

/// Rows of [`CellValue`]s under a fixed list of column names.
///
/// Tables are immutable once handed to a cursor; a reload produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ContactTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContactTable {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// An empty table with the [`ContactQuery::PROJECTION`] columns.
    pub fn with_projection() -> Self {
        Self::new(ContactQuery::PROJECTION)
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                found: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Project arbitrary named records onto [`ContactQuery::PROJECTION`].
    ///
    /// Columns absent from `headers` are filled with `Null`, except
    /// `contact_id` which every contacts table must carry.
    pub fn from_records(
        headers: &[String],
        records: Vec<Vec<CellValue>>,
    ) -> Result<Self, TableError> {
        let source_idx: Vec<Option<usize>> = ContactQuery::PROJECTION
            .iter()
            .map(|name| headers.iter().position(|h| h == name))
            .collect();

        if source_idx[ContactQuery::CONTACT_ID].is_none() {
            return Err(TableError::MissingColumn(
                ContactQuery::PROJECTION[ContactQuery::CONTACT_ID].to_string(),
            ));
        }

        let mut table = Self::with_projection();
        for (row_no, record) in records.into_iter().enumerate() {
            if record.len() != headers.len() {
                return Err(TableError::RowWidth {
                    row: row_no,
                    found: record.len(),
                    expected: headers.len(),
                });
            }
            let row = source_idx
                .iter()
                .map(|idx| match idx {
                    Some(i) => record[*i].clone(),
                    None => CellValue::Null,
                })
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// A new table with the same columns holding the rows at `order`, in
    /// that order. Out-of-range indices are skipped.
    pub fn reordered(&self, order: &[usize]) -> ContactTable {
        ContactTable {
            columns: self.columns.clone(),
            rows: order.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(column)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AccountWithDataSet – which account the picker is scoped to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWithDataSet {
    pub name: String,
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_set: Option<String>,
}

impl AccountWithDataSet {
    pub fn new(name: impl Into<String>, account_type: impl Into<String>) -> Self {
        AccountWithDataSet {
            name: name.into(),
            account_type: account_type.into(),
            data_set: None,
        }
    }

    pub fn with_data_set(mut self, data_set: impl Into<String>) -> Self {
        self.data_set = Some(data_set.into());
        self
    }
}

impl fmt::Display for AccountWithDataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data_set {
            Some(ds) => write!(f, "{} ({}, {ds})", self.name, self.account_type),
            None => write!(f, "{} ({})", self.name, self.account_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn from_records_projects_and_fills_missing_columns() {
        let headers = vec!["display_name".to_string(), "contact_id".to_string()];
        let table = ContactTable::from_records(
            &headers,
            vec![vec![s("Ada"), CellValue::Integer(7)]],
        )
        .unwrap();

        assert_eq!(table.column_names().len(), ContactQuery::PROJECTION.len());
        assert_eq!(table.cell(0, ContactQuery::CONTACT_ID), Some(&CellValue::Integer(7)));
        assert_eq!(table.cell(0, ContactQuery::DISPLAY_NAME), Some(&s("Ada")));
        assert_eq!(table.cell(0, ContactQuery::LOOKUP_KEY), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 0), None);
    }

    #[test]
    fn from_records_requires_contact_id() {
        let headers = vec!["display_name".to_string()];
        let err = ContactTable::from_records(&headers, vec![]).unwrap_err();
        assert_eq!(err, TableError::MissingColumn("contact_id".to_string()));
    }

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut table = ContactTable::new(["a", "b"]);
        table.push_row(vec![CellValue::Null, CellValue::Null]).unwrap();
        let err = table.push_row(vec![CellValue::Null]).unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidth {
                row: 1,
                found: 1,
                expected: 2
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn reordered_picks_rows_in_order() {
        let mut table = ContactTable::new(["n"]);
        for i in 0..3 {
            table.push_row(vec![CellValue::Integer(i)]).unwrap();
        }
        let out = table.reordered(&[2, 0, 7]);
        assert_eq!(out.column_names(), table.column_names());
        assert_eq!(out.len(), 2);
        assert_eq!(out.cell(0, 0), Some(&CellValue::Integer(2)));
        assert_eq!(out.cell(1, 0), Some(&CellValue::Integer(0)));
        assert!(table.reordered(&[]).is_empty());
    }

    #[test]
    fn as_i64_parses_numeric_text() {
        assert_eq!(s(" 42 ").as_i64(), Some(42));
        assert_eq!(s("x").as_i64(), None);
        assert_eq!(CellValue::Float(1.5).as_i64(), None);
    }

    #[test]
    fn account_display_includes_data_set() {
        let account = AccountWithDataSet::new("me@example.com", "com.google").with_data_set("plus");
        assert_eq!(account.to_string(), "me@example.com (com.google, plus)");
    }
}
