use std::sync::Arc;

use super::error::CursorError;
use super::model::{CellValue, ContactTable};

// ---------------------------------------------------------------------------
// RowSource – the navigation / read contract shared by all cursors
// ---------------------------------------------------------------------------

/// A read-only, randomly positionable sequence of rows.
///
/// Navigation reports failure as `false` and never moves on failure. A source
/// that has never been positioned reports `position() == None`, which the
/// relative moves treat as "before the first row".
pub trait RowSource {
    /// Number of rows.
    fn count(&self) -> usize;

    /// Current row, or `None` when unpositioned.
    fn position(&self) -> Option<usize>;

    /// Seek to `position`; succeeds iff `position < count()` and the source is open.
    fn move_to_position(&mut self, position: usize) -> bool;

    fn column_names(&self) -> &[String];

    /// Value of `column` in the current row.
    fn value(&self, column: usize) -> Result<CellValue, CursorError>;

    fn is_closed(&self) -> bool;

    /// Release the source. Every later move fails and every read errors.
    fn close(&mut self);

    fn move_to_first(&mut self) -> bool {
        self.move_to_position(0)
    }

    fn move_to_last(&mut self) -> bool {
        match self.count().checked_sub(1) {
            Some(last) => self.move_to_position(last),
            None => false,
        }
    }

    /// Move relative to the current position.
    fn move_by(&mut self, offset: isize) -> bool {
        let current = self.position().map_or(-1, |p| p as isize);
        match current.checked_add(offset) {
            Some(target) if target >= 0 => self.move_to_position(target as usize),
            _ => false,
        }
    }

    fn move_to_next(&mut self) -> bool {
        self.move_by(1)
    }

    fn move_to_previous(&mut self) -> bool {
        self.move_by(-1)
    }

    fn column_count(&self) -> usize {
        self.column_names().len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|c| c == name)
    }

    /// Read `column` as text. Numbers are rendered in decimal, like a SQL cursor.
    fn get_string(&self, column: usize) -> Result<Option<String>, CursorError> {
        Ok(match self.value(column)? {
            CellValue::Null => None,
            CellValue::String(s) => Some(s),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Bool(b) => Some(i64::from(b).to_string()),
        })
    }

    /// Read `column` as an integer; numeric text is accepted.
    fn get_long(&self, column: usize) -> Result<Option<i64>, CursorError> {
        let value = self.value(column)?;
        if value.is_null() {
            return Ok(None);
        }
        match value.as_i64() {
            Some(i) => Ok(Some(i)),
            None => Err(CursorError::TypeMismatch {
                column,
                found: value.type_name(),
                expected: "integer",
            }),
        }
    }
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn position(&self) -> Option<usize> {
        (**self).position()
    }

    fn move_to_position(&mut self, position: usize) -> bool {
        (**self).move_to_position(position)
    }

    fn column_names(&self) -> &[String] {
        (**self).column_names()
    }

    fn value(&self, column: usize) -> Result<CellValue, CursorError> {
        (**self).value(column)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

// ---------------------------------------------------------------------------
// TableCursor – a cursor over a materialised ContactTable
// ---------------------------------------------------------------------------

/// The cursor a load delivers: shares the table, owns only its position.
#[derive(Debug, Clone)]
pub struct TableCursor {
    table: Arc<ContactTable>,
    position: Option<usize>,
    closed: bool,
}

impl TableCursor {
    pub fn new(table: Arc<ContactTable>) -> Self {
        TableCursor {
            table,
            position: None,
            closed: false,
        }
    }
}

impl RowSource for TableCursor {
    fn count(&self) -> usize {
        self.table.len()
    }

    fn position(&self) -> Option<usize> {
        self.position
    }

    fn move_to_position(&mut self, position: usize) -> bool {
        if self.closed || position >= self.table.len() {
            return false;
        }
        self.position = Some(position);
        true
    }

    fn column_names(&self) -> &[String] {
        self.table.column_names()
    }

    fn value(&self, column: usize) -> Result<CellValue, CursorError> {
        if self.closed {
            return Err(CursorError::Closed);
        }
        let row = self.position.ok_or(CursorError::NotPositioned)?;
        self.table
            .cell(row, column)
            .cloned()
            .ok_or(CursorError::ColumnOutOfRange {
                column,
                count: self.table.column_names().len(),
            })
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        self.closed = true;
        self.position = None;
    }
}
