use std::collections::BTreeSet;

use log::{debug, warn};

use super::cursor::RowSource;
use super::error::CursorError;
use super::model::CellValue;

// ---------------------------------------------------------------------------
// ExclusionSet: keys that must not appear in the filtered view
// ---------------------------------------------------------------------------

/// Raw contact ids already in the group. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ExclusionSet {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredRowView: a re-indexed view over a RowSource
// ---------------------------------------------------------------------------

/// Hides the rows whose key column is in an [`ExclusionSet`] and exposes the
/// remaining rows as a contiguous `0..count()` position space.
///
/// The index map is built once, by a single in-order scan of the source, and
/// is strictly increasing: filtered order is source order minus exclusions.
/// Column reads go straight to the source at its current row.
///
/// A non-empty view starts positioned on its first row. An empty view starts
/// unpositioned and stays that way.
#[derive(Debug)]
pub struct FilteredRowView<S: RowSource> {
    source: S,
    index: Vec<usize>,
    position: Option<usize>,
}

impl<S: RowSource> FilteredRowView<S> {
    pub fn new(mut source: S, exclusions: &ExclusionSet, key_column: usize) -> Self {
        let total = if source.is_closed() {
            warn!("filtering a closed row source; the view will be empty");
            0
        } else {
            source.count()
        };
        debug!("filtered view starting size is {total}");
        if exclusions.is_empty() {
            debug!("no excluded keys; every row is kept");
        }

        let mut index = Vec::with_capacity(total);
        let mut unreadable = 0usize;
        for row in 0..total {
            if !source.move_to_position(row) {
                continue;
            }
            let key = match source.get_string(key_column) {
                Ok(key) => key,
                Err(_) => {
                    unreadable += 1;
                    None
                }
            };
            if !key.is_some_and(|k| exclusions.contains(&k)) {
                index.push(row);
            }
        }
        if unreadable > 0 {
            warn!("key column {key_column} unreadable in {unreadable} rows; kept them");
        }

        let mut position = None;
        if let Some(&first) = index.first() {
            if source.move_to_position(first) {
                position = Some(0);
            }
        }
        debug!(
            "filtered view ending size is {} ({} excluded)",
            index.len(),
            total - index.len()
        );

        FilteredRowView {
            source,
            index,
            position,
        }
    }

    /// Filtered position → underlying position.
    pub fn index_map(&self) -> &[usize] {
        &self.index
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: RowSource> RowSource for FilteredRowView<S> {
    fn count(&self) -> usize {
        self.index.len()
    }

    fn position(&self) -> Option<usize> {
        self.position
    }

    fn move_to_position(&mut self, position: usize) -> bool {
        if self.source.is_closed() {
            return false;
        }
        let Some(&row) = self.index.get(position) else {
            return false;
        };
        if !self.source.move_to_position(row) {
            return false;
        }
        self.position = Some(position);
        true
    }

    fn column_names(&self) -> &[String] {
        self.source.column_names()
    }

    fn value(&self, column: usize) -> Result<CellValue, CursorError> {
        if self.position.is_none() && !self.source.is_closed() {
            return Err(CursorError::NotPositioned);
        }
        self.source.value(column)
    }

    fn is_closed(&self) -> bool {
        self.source.is_closed()
    }

    fn close(&mut self) {
        self.source.close();
        self.position = None;
    }
}
