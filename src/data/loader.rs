use std::path::Path;

use log::info;

use super::model::Row;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Parse output
// ---------------------------------------------------------------------------

/// What the delimited-text parser hands to the pipeline: header fields in
/// source order plus every record keyed by those fields.
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Field separator for a supported file type.
pub fn delimiter_for(path: &Path) -> Result<u8> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => Ok(b','),
        "tsv" | "tab" => Ok(b'\t'),
        "psv" => Ok(b'|'),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}

/// Load a delimited file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma separated
/// * `.tsv` – tab separated
/// * `.psv` – pipe separated
pub fn load_file(path: &Path) -> Result<ParsedTable> {
    let delimiter = delimiter_for(path)?;
    let bytes = std::fs::read(path).map_err(csv::Error::from)?;
    let table = parse_delimited(&bytes, delimiter)?;
    info!(
        "loaded {} rows x {} columns from {}",
        table.rows.len(),
        table.header.len(),
        path.display()
    );
    Ok(table)
}

/// Parse delimited text with a header row.
///
/// Blank lines are skipped. A record with a different number of fields than
/// the header fails the whole parse; rows are never partially accepted.
pub fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let header: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows: Vec<Row> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            header
                .iter()
                .zip(record.iter())
                .map(|(col, value)| (col.as_str(), value))
                .collect(),
        );
    }

    Ok(ParsedTable { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows_in_order() {
        let text = "Date,Region,Discount_Percent\n2024-01-01,EU,10\n\n2024-02-01,US,5\n";
        let table = parse_delimited(text.as_bytes(), b',').unwrap();

        assert_eq!(table.header, vec!["Date", "Region", "Discount_Percent"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Region"), "EU");
        assert_eq!(table.rows[1].get("Discount_Percent"), "5");
    }

    #[test]
    fn ragged_record_fails_whole_parse() {
        let text = "a,b\n1,2\n3\n";
        let err = parse_delimited(text.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
    }

    #[test]
    fn tab_delimiter_by_extension() {
        assert_eq!(delimiter_for(Path::new("data.TSV")).unwrap(), b'\t');
        assert!(matches!(
            delimiter_for(Path::new("data.xlsx")),
            Err(Error::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
