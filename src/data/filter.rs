use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{Row, number_or_zero};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Comparison applied by a filter slot.
///
/// Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    /// Case-sensitive substring match on the raw cell.
    Substring,
    /// Cell value must be `>=` the operand.
    NumericMin,
    /// Cell value must be `<=` the operand.
    NumericMax,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Substring => "substring",
            FilterKind::NumericMin => "numericMin",
            FilterKind::NumericMax => "numericMax",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substring" | "contains" => Ok(FilterKind::Substring),
            "numericMin" | "min" => Ok(FilterKind::NumericMin),
            "numericMax" | "max" => Ok(FilterKind::NumericMax),
            other => Err(format!("unknown filter kind '{other}'")),
        }
    }
}

/// One predicate over one column. An empty operand means "inactive".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(alias = "id")]
    pub kind: FilterKind,
    pub column: String,
    #[serde(default)]
    pub operand: String,
}

impl FilterSpec {
    pub fn new(kind: FilterKind, column: &str, operand: &str) -> Self {
        FilterSpec {
            kind,
            column: column.to_string(),
            operand: operand.to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.operand.is_empty()
    }

    /// Whether `row` satisfies this predicate. Inactive specs accept everything.
    pub fn matches(&self, row: &Row) -> bool {
        if !self.is_active() {
            return true;
        }
        let cell = row.get(&self.column);
        match self.kind {
            FilterKind::Substring => cell.contains(self.operand.as_str()),
            FilterKind::NumericMin => number_or_zero(cell) >= number_or_zero(&self.operand),
            FilterKind::NumericMax => number_or_zero(cell) <= number_or_zero(&self.operand),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSet – named slots
// ---------------------------------------------------------------------------

/// Built-in slots for sales datasets: (slot, kind, column).
const REFERENCE_SLOTS: [(&str, FilterKind, &str); 5] = [
    ("date", FilterKind::Substring, "Date"),
    ("region", FilterKind::Substring, "Region"),
    ("productType", FilterKind::Substring, "Product_Type"),
    ("discount", FilterKind::NumericMin, "Discount_Percent"),
    ("returnRate", FilterKind::NumericMax, "Return_Rate"),
];

/// All filter slots, keyed by slot name. At most one spec per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    slots: BTreeMap<String, FilterSpec>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// An inactive spec for one of the built-in slots, if `slot` names one.
    pub fn reference_slot(slot: &str) -> Option<FilterSpec> {
        REFERENCE_SLOTS
            .iter()
            .find(|(name, _, _)| *name == slot)
            .map(|(_, kind, column)| FilterSpec::new(*kind, column, ""))
    }

    pub fn reference_slot_names() -> impl Iterator<Item = &'static str> {
        REFERENCE_SLOTS.iter().map(|(name, _, _)| *name)
    }

    /// Insert or overwrite a slot, returning the previous spec.
    pub fn insert(&mut self, slot: &str, spec: FilterSpec) -> Option<FilterSpec> {
        self.slots.insert(slot.to_string(), spec)
    }

    pub fn remove(&mut self, slot: &str) -> Option<FilterSpec> {
        self.slots.remove(slot)
    }

    pub fn get(&self, slot: &str) -> Option<&FilterSpec> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterSpec)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Active specs in evaluation order: by kind, then slot name.
    pub fn active(&self) -> Vec<(&str, &FilterSpec)> {
        let mut active: Vec<_> = self.iter().filter(|(_, spec)| spec.is_active()).collect();
        active.sort_by_key(|(slot, spec)| (spec.kind, *slot));
        active
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return the rows passing every active filter, in their original order.
///
/// Always a fresh vector; `rows` is never modified. With no active filters
/// the result equals the input.
pub fn apply_filters(rows: &[Row], filters: &FilterSet) -> Vec<Row> {
    let active = filters.active();
    if active.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| active.iter().all(|(_, spec)| spec.matches(row)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, region: &str, discount: &str) -> Row {
        [
            ("Date", date),
            ("Region", region),
            ("Discount_Percent", discount),
        ]
        .into_iter()
        .collect()
    }

    fn sample() -> Vec<Row> {
        vec![
            row("2024-01-01", "EU", "10"),
            row("2024-02-01", "US", "5"),
        ]
    }

    fn with_operand(slot: &str, operand: &str) -> FilterSet {
        let mut set = FilterSet::new();
        let mut spec = FilterSet::reference_slot(slot).unwrap();
        spec.operand = operand.to_string();
        set.insert(slot, spec);
        set
    }

    #[test]
    fn inactive_filters_are_identity() {
        let rows = sample();
        let mut set = FilterSet::new();
        for slot in FilterSet::reference_slot_names() {
            set.insert(slot, FilterSet::reference_slot(slot).unwrap());
        }
        assert_eq!(apply_filters(&rows, &set), rows);
        assert_eq!(apply_filters(&rows, &FilterSet::new()), rows);
    }

    #[test]
    fn region_substring_keeps_first_row() {
        let rows = sample();
        let out = apply_filters(&rows, &with_operand("region", "EU"));
        assert_eq!(out, vec![rows[0].clone()]);
    }

    #[test]
    fn substring_is_case_sensitive() {
        let rows = sample();
        assert!(apply_filters(&rows, &with_operand("region", "eu")).is_empty());
        assert_eq!(apply_filters(&rows, &with_operand("date", "-02-")).len(), 1);
    }

    #[test]
    fn discount_minimum_excludes_smaller_values() {
        let rows = sample();
        let out = apply_filters(&rows, &with_operand("discount", "6"));
        assert_eq!(out, vec![rows[0].clone()]);
    }

    #[test]
    fn unparseable_cells_count_as_zero() {
        let rows = vec![row("d", "EU", "n/a"), row("d", "EU", "3")];
        let mut set = FilterSet::new();
        set.insert("max", FilterSpec::new(FilterKind::NumericMax, "Discount_Percent", "1"));
        // "n/a" reads as 0 and passes `<= 1`; it is not dropped for being unparseable.
        assert_eq!(apply_filters(&rows, &set), vec![rows[0].clone()]);
    }

    #[test]
    fn missing_column_never_matches_substring() {
        let rows = sample();
        let mut set = FilterSet::new();
        set.insert("x", FilterSpec::new(FilterKind::Substring, "Product_Type", "A"));
        assert!(apply_filters(&rows, &set).is_empty());
    }

    #[test]
    fn min_max_bounds_hold_and_order_is_preserved() {
        let rows: Vec<Row> = ["7", "1", "12", "4", "9", "x", "5"]
            .iter()
            .map(|d| row("d", "r", d))
            .collect();
        let mut set = FilterSet::new();
        set.insert("lo", FilterSpec::new(FilterKind::NumericMin, "Discount_Percent", "4"));
        set.insert("hi", FilterSpec::new(FilterKind::NumericMax, "Discount_Percent", "9"));

        let out = apply_filters(&rows, &set);
        let values: Vec<&str> = out.iter().map(|r| r.get("Discount_Percent")).collect();
        assert_eq!(values, vec!["7", "4", "9", "5"]);
        for r in &out {
            let v = number_or_zero(r.get("Discount_Percent"));
            assert!((4.0..=9.0).contains(&v), "{v} outside [4, 9]");
        }
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let rows = sample();
        let set = with_operand("discount", "6");
        let once = apply_filters(&rows, &set);
        let twice = apply_filters(&once, &set);
        assert_eq!(once, twice);
    }

    #[test]
    fn active_specs_sorted_by_kind_then_slot() {
        let mut set = FilterSet::new();
        set.insert("b", FilterSpec::new(FilterKind::NumericMax, "c", "1"));
        set.insert("z", FilterSpec::new(FilterKind::Substring, "c", "x"));
        set.insert("a", FilterSpec::new(FilterKind::NumericMin, "c", "0"));
        set.insert("off", FilterSpec::new(FilterKind::Substring, "c", ""));
        let order: Vec<&str> = set.active().into_iter().map(|(slot, _)| slot).collect();
        assert_eq!(order, vec!["z", "a", "b"]);
    }

    #[test]
    fn filter_set_serializes_as_slot_map() {
        let set = with_operand("region", "EU");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"{"region":{"kind":"substring","column":"Region","operand":"EU"}}"#
        );
        let back: FilterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(serde_json::to_string(&FilterSet::new()).unwrap(), "{}");
    }
}
