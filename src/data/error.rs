use thiserror::Error;

/// Failures reading a column through a [`RowSource`](super::cursor::RowSource).
///
/// Navigation never produces these; moves report failure as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("cursor is closed")]
    Closed,

    #[error("cursor is not positioned on a row")]
    NotPositioned,

    #[error("column {column} out of range (cursor has {count} columns)")]
    ColumnOutOfRange { column: usize, count: usize },

    #[error("column {column} holds a {found} value, expected {expected}")]
    TypeMismatch {
        column: usize,
        found: &'static str,
        expected: &'static str,
    },
}

/// Failures building a [`ContactTable`](super::model::ContactTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("required column '{0}' is missing")]
    MissingColumn(String),
}
