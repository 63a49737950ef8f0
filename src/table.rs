use crate::data::model::{ColumnDescriptor, Row};

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

/// Header labels plus a cell matrix, both in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl TableView {
    pub fn new(columns: &[ColumnDescriptor], rows: &[Row]) -> Self {
        let headers = columns.iter().map(|c| c.display_label.clone()).collect();
        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(&c.name).to_string())
                    .collect()
            })
            .collect();
        TableView { headers, cells }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Plain-text grid of at most `limit` rows.
    pub fn render_text(&self, limit: usize) -> String {
        let shown = &self.cells[..self.cells.len().min(limit)];
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                shown
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        push_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in shown {
            push_line(&mut out, row, &widths);
        }
        if self.cells.len() > shown.len() {
            out.push_str(&format!("... {} more rows\n", self.cells.len() - shown.len()));
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::infer_schema;

    #[test]
    fn cells_follow_descriptor_order() {
        let columns = infer_schema(&["Region", "Sales"]).unwrap();
        let rows: Vec<Row> = vec![[("Sales", "10"), ("Region", "EU")].into_iter().collect()];
        let table = TableView::new(&columns, &rows);
        assert_eq!(table.headers, vec!["Region", "Sales"]);
        assert_eq!(table.cells, vec![vec!["EU".to_string(), "10".to_string()]]);
    }

    #[test]
    fn text_rendering_truncates() {
        let columns = infer_schema(&["Region", "Sales"]).unwrap();
        let rows: Vec<Row> = ["EU", "US", "APAC"]
            .iter()
            .map(|r| [("Region", *r), ("Sales", "1")].into_iter().collect())
            .collect();
        let table = TableView::new(&columns, &rows);
        assert_eq!(table.row_count(), 3);
        let text = table.render_text(2);
        assert_eq!(
            text,
            "Region | Sales\n------ | -----\nEU     | 1\nUS     | 1\n... 1 more rows\n"
        );
    }
}
