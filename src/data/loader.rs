use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array,
    Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, ContactQuery, ContactTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a contacts table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per [`ContactQuery`](super::model::ContactQuery) field
/// * `.json`    – `[{ "contact_id": 1, "display_name": "...", ... }, ...]`
/// * `.csv`     – header row with the column names
///
/// Only `contact_id` is mandatory; other projection columns default to null
/// and unknown columns are ignored.
pub fn load_contacts(path: &Path) -> Result<ContactTable> {
    let table = match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading contacts from {}", path.display()))?;

    log::info!("Loaded {} contacts from {}", table.len(), path.display());
    Ok(table)
}

/// Load the raw contact ids already in the group.
///
/// `.json` files hold an array of strings or integers; anything else is read
/// as one id per line, skipping blank lines and `#` comments.
pub fn load_member_ids(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading member ids from {}", path.display()))?;

    let ids = if extension(path) == "json" {
        let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
        let items = root.as_array().context("Expected top-level JSON array")?;
        items
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                JsonValue::String(s) => Ok(s.clone()),
                JsonValue::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
                other => bail!("Item {i}: expected a string or integer id, got {other}"),
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    log::info!("Loaded {} group member ids from {}", ids.len(), path.display());
    Ok(ids)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, one object per contact. Column order follows the
/// first appearance of each key.
fn load_json(path: &Path) -> Result<ContactTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows: Vec<Vec<CellValue>> = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(ContactTable::from_records(&headers, rows)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one contact per record.
/// Empty fields are null. Only the id columns are parsed as numbers; every
/// other field is kept as the text it was written as.
fn load_csv(path: &Path) -> Result<ContactTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, field)| csv_cell(header, field))
                .collect(),
        );
    }

    Ok(ContactTable::from_records(&headers, rows)?)
}

fn csv_cell(header: &str, s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    let id_column = header == ContactQuery::PROJECTION[ContactQuery::CONTACT_ID]
        || header == ContactQuery::PROJECTION[ContactQuery::PHOTO_ID];
    if id_column {
        if let Ok(i) = s.trim().parse::<i64>() {
            return CellValue::Integer(i);
        }
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of contacts; every record batch must share the
/// file schema.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and `generate_sample`.
fn load_parquet(path: &Path) -> Result<ContactTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(ContactTable::from_records(&headers, rows)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(i64::from(a.value(row)))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(f64::from(a.value(row)))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        other => Some(CellValue::String(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::cursor::{RowSource, TableCursor};
    use crate::data::model::AccountWithDataSet;
    use crate::data::query::ContactListFilter;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "contacts.json",
            r#"[
                {"contact_id": 1, "display_name": "Ada", "account_name": "work"},
                {"contact_id": 2, "display_name": null, "extra": [1, 2]}
            ]"#,
        );
        let table = load_contacts(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, ContactQuery::CONTACT_ID), Some(&CellValue::Integer(1)));
        assert_eq!(
            table.cell(0, ContactQuery::ACCOUNT_NAME),
            Some(&CellValue::String("work".into()))
        );
        assert_eq!(table.cell(1, ContactQuery::ACCOUNT_NAME), Some(&CellValue::Null));
        assert_eq!(table.cell(1, ContactQuery::DISPLAY_NAME), Some(&CellValue::Null));
    }

    #[test]
    fn loads_csv_with_empty_fields_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "contacts.csv",
            "contact_id,display_name,photo_id\n7,Grace,\n8,Linus,12\n",
        );
        let table = load_contacts(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, ContactQuery::PHOTO_ID), Some(&CellValue::Null));
        assert_eq!(table.cell(1, ContactQuery::PHOTO_ID), Some(&CellValue::Integer(12)));
    }

    #[test]
    fn csv_text_columns_keep_their_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "contacts.csv",
            "contact_id,display_name,lookup,account_type,account_name\n\
             1,Nan,0012,com.x,2024\n\
             2,Infinity,1e3,com.x,2024\n",
        );
        let table = load_contacts(&path).unwrap();

        let mut cursor = TableCursor::new(Arc::new(table.clone()));
        assert!(cursor.move_to_first());
        assert_eq!(cursor.get_long(ContactQuery::CONTACT_ID), Ok(Some(1)));
        assert_eq!(cursor.get_string(ContactQuery::DISPLAY_NAME).unwrap().as_deref(), Some("Nan"));
        assert_eq!(cursor.get_string(ContactQuery::LOOKUP_KEY).unwrap().as_deref(), Some("0012"));
        assert!(cursor.move_to_next());
        assert_eq!(
            cursor.get_string(ContactQuery::DISPLAY_NAME).unwrap().as_deref(),
            Some("Infinity")
        );
        assert_eq!(cursor.get_string(ContactQuery::LOOKUP_KEY).unwrap().as_deref(), Some("1e3"));

        let filter = ContactListFilter::group_members(AccountWithDataSet::new("2024", "com.x"));
        assert_eq!(ContactQuery::select(&table, &filter).len(), 2);
    }

    #[test]
    fn loads_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("contact_id", DataType::Int64, false),
            Field::new("display_name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![5, 6])),
                Arc::new(StringArray::from(vec![Some("Ada"), None])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_contacts(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, ContactQuery::CONTACT_ID), Some(&CellValue::Integer(6)));
        assert_eq!(
            table.cell(0, ContactQuery::DISPLAY_NAME),
            Some(&CellValue::String("Ada".into()))
        );
        assert_eq!(table.cell(1, ContactQuery::DISPLAY_NAME), Some(&CellValue::Null));
    }

    #[test]
    fn rejects_missing_contact_id_and_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(&dir, "contacts.csv", "display_name\nAda\n");
        let err = load_contacts(&csv).unwrap_err();
        assert!(format!("{err:#}").contains("contact_id"));

        let txt = write(&dir, "contacts.txt", "");
        assert!(load_contacts(&txt).is_err());
    }

    #[test]
    fn loads_member_ids_from_json_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(&dir, "members.json", r#"["3", 4]"#);
        assert_eq!(load_member_ids(&json).unwrap(), vec!["3", "4"]);

        let text = write(&dir, "members.txt", "# group 1\n3\n\n 4 \n");
        assert_eq!(load_member_ids(&text).unwrap(), vec!["3", "4"]);

        let bad = write(&dir, "bad.json", r#"[1.5]"#);
        assert!(load_member_ids(&bad).is_err());
    }
}
