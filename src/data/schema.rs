use std::collections::HashSet;
use std::fmt;

use super::model::{ColumnDescriptor, Row, parse_number};
use crate::error::{Error, Result, SchemaError};

// ---------------------------------------------------------------------------
// Schema inference
// ---------------------------------------------------------------------------

/// Map header fields 1:1, in order, to column descriptors.
///
/// Duplicate names would make filter and axis targets ambiguous, so they are
/// rejected rather than deduplicated.
pub fn infer_schema<S: AsRef<str>>(header: &[S]) -> Result<Vec<ColumnDescriptor>, SchemaError> {
    if header.is_empty() {
        return Err(SchemaError::EmptyHeader);
    }
    let mut seen = HashSet::with_capacity(header.len());
    header
        .iter()
        .map(|field| {
            let field = field.as_ref();
            if !seen.insert(field) {
                return Err(SchemaError::DuplicateColumn(field.to_string()));
            }
            Ok(ColumnDescriptor::new(field))
        })
        .collect()
}

/// Default chart axes for a fresh schema: first column on x, second on y.
pub fn default_axes(columns: &[ColumnDescriptor]) -> Result<(String, String)> {
    match columns {
        [x, y, ..] => Ok((x.name.clone(), y.name.clone())),
        _ => Err(Error::InsufficientColumns {
            found: columns.len(),
        }),
    }
}

/// Fail with [`Error::UnknownColumn`] unless `name` is one of `columns`.
pub fn require_column(columns: &[ColumnDescriptor], name: &str) -> Result<()> {
    if columns.iter().any(|c| c.name == name) {
        Ok(())
    } else {
        Err(Error::UnknownColumn(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Column value kinds
// ---------------------------------------------------------------------------

/// Best-effort classification of a column's non-empty cells.
///
/// Informational only; filtering and projection always work on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every cell is empty (or there are no rows).
    Empty,
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    fn of_cell(s: &str) -> Self {
        if s.is_empty() {
            return ColumnKind::Empty;
        }
        if s.parse::<i64>().is_ok() {
            return ColumnKind::Integer;
        }
        // Only whole-cell numbers count; "10%" is text even though it filters as 10.
        if s.parse::<f64>().is_ok() && parse_number(s).is_some() {
            return ColumnKind::Float;
        }
        if s == "true" || s == "false" {
            return ColumnKind::Boolean;
        }
        ColumnKind::Text
    }

    fn merge(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (Empty, k) | (k, Empty) => k,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Text,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Empty => "empty",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Classify every column, in descriptor order.
pub fn infer_kinds(columns: &[ColumnDescriptor], rows: &[Row]) -> Vec<ColumnKind> {
    columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|row| ColumnKind::of_cell(row.get(&col.name)))
                .fold(ColumnKind::Empty, ColumnKind::merge)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_follow_header_order() {
        let cols = infer_schema(&["Date", "Region"]).unwrap();
        assert_eq!(
            cols,
            vec![ColumnDescriptor::new("Date"), ColumnDescriptor::new("Region")]
        );
        assert_eq!(cols[1].display_label, "Region");
    }

    #[test]
    fn duplicate_and_empty_headers_are_rejected() {
        assert_eq!(
            infer_schema(&["Date", "Date"]),
            Err(SchemaError::DuplicateColumn("Date".into()))
        );
        assert_eq!(infer_schema::<&str>(&[]), Err(SchemaError::EmptyHeader));
    }

    #[test]
    fn default_axes_need_two_columns() {
        let cols = infer_schema(&["Date", "Region", "Sales"]).unwrap();
        assert_eq!(
            default_axes(&cols).unwrap(),
            ("Date".to_string(), "Region".to_string())
        );

        let single = infer_schema(&["Date"]).unwrap();
        assert!(matches!(
            default_axes(&single),
            Err(Error::InsufficientColumns { found: 1 })
        ));
    }

    #[test]
    fn require_column_checks_descriptors() {
        let cols = infer_schema(&["Date"]).unwrap();
        assert!(require_column(&cols, "Date").is_ok());
        assert!(matches!(
            require_column(&cols, "Sales"),
            Err(Error::UnknownColumn(c)) if c == "Sales"
        ));
    }

    #[test]
    fn kinds_merge_across_rows() {
        let cols = infer_schema(&["a", "b", "c", "d", "e"]).unwrap();
        let rows: Vec<Row> = vec![
            [("a", "1"), ("b", "1"), ("c", "x"), ("d", ""), ("e", "true")]
                .into_iter()
                .collect(),
            [("a", "2"), ("b", "1.5"), ("c", "3"), ("d", ""), ("e", "false")]
                .into_iter()
                .collect(),
        ];
        assert_eq!(
            infer_kinds(&cols, &rows),
            vec![
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Text,
                ColumnKind::Empty,
                ColumnKind::Boolean,
            ]
        );
    }
}
