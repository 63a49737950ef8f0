use std::path::Path;

use log::info;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::model::{ColumnDescriptor, Row};
use crate::error::{Error, Result};

pub const CSV_FILE_NAME: &str = "filtered_data.csv";
pub const JSON_FILE_NAME: &str = "filtered_data.json";

// ---------------------------------------------------------------------------
// Ordered row serialization
// ---------------------------------------------------------------------------

/// Serializes rows as an array of objects whose keys follow descriptor order.
#[derive(Debug, Clone, Copy)]
pub struct OrderedRows<'a> {
    pub columns: &'a [ColumnDescriptor],
    pub rows: &'a [Row],
}

struct OrderedRow<'a> {
    columns: &'a [ColumnDescriptor],
    row: &'a Row,
}

impl Serialize for OrderedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&OrderedRow {
                columns: self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for OrderedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for col in self.columns {
            map.serialize_entry(&col.name, self.row.get(&col.name))?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Export formats
// ---------------------------------------------------------------------------

/// Delimited text: header of column names, one record per row.
pub fn to_csv(columns: &[ColumnDescriptor], rows: &[Row]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| c.name.as_str()))
        .map_err(export_error)?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|c| row.get(&c.name)))
            .map_err(export_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| export_error(e.error()))?;
    String::from_utf8(bytes).map_err(export_error)
}

/// Pretty-printed JSON array of row objects.
pub fn to_json(columns: &[ColumnDescriptor], rows: &[Row]) -> Result<String> {
    serde_json::to_string_pretty(&OrderedRows { columns, rows }).map_err(export_error)
}

/// Write an export artifact to disk.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .map_err(|e| Error::Export(format!("{}: {e}", path.display())))?;
    info!("exported {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn export_error(e: impl std::fmt::Display) -> Error {
    Error::Export(e.to_string())
}
