use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Row – one ingested record
// ---------------------------------------------------------------------------

/// A single record keyed by column name.
///
/// Rows are immutable once ingested; downstream stages only ever copy them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Raw cell value for `column`, or `""` when the row has no such cell.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnDescriptor / Dataset
// ---------------------------------------------------------------------------

/// Schema entry naming a valid filter or axis target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    pub display_label: String,
}

impl ColumnDescriptor {
    pub fn new(field: &str) -> Self {
        ColumnDescriptor {
            name: field.to_string(),
            display_label: field.to_string(),
        }
    }
}

/// The raw ingested dataset: descriptors in header order plus rows in source order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Lenient numeric parsing
// ---------------------------------------------------------------------------

/// Parse the longest numeric prefix of `raw`.
///
/// Leading whitespace is skipped and anything after the number is ignored,
/// so `"10%"` is `10` and `" 2.5e1 kg"` is `25`. Returns `None` when no
/// digits lead the value.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_digits = count_digits(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = count_digits(bytes, exp_start);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Numeric value of a cell or operand, coercing unparseable input to `0`.
///
/// Filtering and chart projection both rely on this: a non-numeric cell is
/// never dropped for being non-numeric, it simply counts as zero.
pub fn number_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_numbers() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("  .25"), Some(0.25));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("10%"), Some(10.0));
        assert_eq!(parse_number("2.5e1 kg"), Some(25.0));
        assert_eq!(parse_number("7e"), Some(7.0));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn rejects_values_without_leading_digits() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(number_or_zero("n/a"), 0.0);
    }

    #[test]
    fn missing_cells_read_as_empty() {
        let row: Row = [("Region", "EU")].into_iter().collect();
        assert_eq!(row.get("Region"), "EU");
        assert_eq!(row.get("Date"), "");
        assert!(!row.contains_column("Date"));
    }
}
