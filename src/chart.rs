use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ChartPalette;
use crate::data::model::{ColumnDescriptor, Row, number_or_zero};
use crate::data::schema::require_column;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    #[default]
    #[serde(alias = "BarChart")]
    Bar,
    #[serde(alias = "LineChart")]
    Line,
    #[serde(alias = "PieChart")]
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" | "barchart" => Ok(ChartKind::Bar),
            "line" | "linechart" => Ok(ChartKind::Line),
            "pie" | "piechart" => Ok(ChartKind::Pie),
            other => Err(format!("unknown chart kind '{other}' (expected bar, line or pie)")),
        }
    }
}

/// One configured chart. Immutable once appended to a chart list.
///
/// Also accepts the legacy field names `xAxis`, `yAxis` and `chartType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(alias = "xAxis")]
    pub x_column: String,
    #[serde(alias = "yAxis")]
    pub y_column: String,
    #[serde(alias = "chartType", default)]
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(x_column: &str, y_column: &str, kind: ChartKind) -> Self {
        ChartSpec {
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Series – render-ready output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub x: String,
    pub y: f64,
    /// Palette slot; only set for pie charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Projected points for one chart, in input row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub spec: ChartSpec,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Turn each row into exactly one chart point.
///
/// Both axis columns are validated against `columns` up front. `y` falls
/// back to `0` for non-numeric cells; pie points also get a colour.
pub fn project(
    columns: &[ColumnDescriptor],
    rows: &[Row],
    spec: &ChartSpec,
    palette: &ChartPalette,
) -> Result<Series> {
    require_column(columns, &spec.x_column)?;
    require_column(columns, &spec.y_column)?;

    let points = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut point = SeriesPoint {
                x: row.get(&spec.x_column).to_string(),
                y: number_or_zero(row.get(&spec.y_column)),
                color_index: None,
                color: None,
            };
            if spec.kind == ChartKind::Pie {
                colorize(&mut point, i, palette);
            }
            point
        })
        .collect();

    Ok(Series {
        spec: spec.clone(),
        points,
    })
}

/// Sum `y` per distinct `x`, keeping first-appearance order.
///
/// Opt-in categorical roll-up (one slice per category); [`project`] itself
/// never groups rows.
pub fn aggregate_by_x(series: &Series, palette: &ChartPalette) -> Series {
    let mut points: Vec<SeriesPoint> = Vec::new();
    for p in &series.points {
        match points.iter_mut().find(|q| q.x == p.x) {
            Some(existing) => existing.y += p.y,
            None => points.push(SeriesPoint {
                x: p.x.clone(),
                y: p.y,
                color_index: None,
                color: None,
            }),
        }
    }
    if series.spec.kind == ChartKind::Pie {
        for (i, point) in points.iter_mut().enumerate() {
            colorize(point, i, palette);
        }
    }
    Series {
        spec: series.spec.clone(),
        points,
    }
}

fn colorize(point: &mut SeriesPoint, position: usize, palette: &ChartPalette) {
    let index = palette.index_for(position);
    point.color_index = Some(index);
    point.color = Some(palette.hex(index));
}
