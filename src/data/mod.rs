/// Data layer: contact tables, cursors, the loader query, and the
/// exclusion filter.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ContactTable (ContactQuery projection)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  account filter + display-name order → ContactTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cursor   │  TableCursor: RowSource over the table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilteredRowView: drop existing members, re-index
///   └──────────┘
/// ```

pub mod cursor;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
