use std::path::Path;

use log::{debug, info, warn};

use crate::chart::{ChartKind, ChartSpec, Series, project};
use crate::color::ChartPalette;
use crate::data::export::{OrderedRows, to_csv, to_json};
use crate::data::filter::{FilterSet, FilterSpec, apply_filters};
use crate::data::loader::{ParsedTable, load_file, parse_delimited};
use crate::data::model::{ColumnDescriptor, Dataset, Row};
use crate::data::schema::{ColumnKind, default_axes, infer_kinds, infer_schema, require_column};
use crate::error::{Error, Result, StoreError};
use crate::store::{ConfigStore, Configuration, MessageResponse, SubmitRequest, UserConfiguration};
use crate::table::TableView;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient, user-facing outcome of the last transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Notice {
            level,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// In-flight store requests
// ---------------------------------------------------------------------------

/// A load that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    generation: u64,
    pub user_id: String,
}

/// A save snapshot taken when the request was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    generation: u64,
    pub request: UserConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Filters and charts were replaced by the stored configuration.
    Applied,
    /// Nothing stored for this user yet; filters and charts were cleared.
    NotFound,
    /// A newer dataset was ingested after the request; the result was dropped.
    Stale,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one user session owns, independent of rendering.
///
/// `filtered_rows` is derived from `dataset.rows` and `filters` and is
/// recomputed whenever either changes; nothing else writes it.
#[derive(Debug, Default)]
pub struct SessionState {
    dataset: Dataset,
    column_kinds: Vec<ColumnKind>,
    filters: FilterSet,
    filtered_rows: Vec<Row>,
    charts: Vec<ChartSpec>,

    x_axis: Option<String>,
    y_axis: Option<String>,
    chart_kind: ChartKind,

    palette: ChartPalette,

    /// Bumped on every successful ingestion; used to drop stale loads.
    generation: u64,

    /// Status / error message shown to the user.
    status_message: Option<Notice>,
}

impl SessionState {
    pub fn new(palette: ChartPalette) -> Self {
        SessionState {
            palette,
            ..Default::default()
        }
    }

    // -- accessors --

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.dataset.columns
    }

    pub fn column_kinds(&self) -> &[ColumnKind] {
        &self.column_kinds
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn filtered_rows(&self) -> &[Row] {
        &self.filtered_rows
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn x_axis(&self) -> Option<&str> {
        self.x_axis.as_deref()
    }

    pub fn y_axis(&self) -> Option<&str> {
        self.y_axis.as_deref()
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    pub fn palette(&self) -> &ChartPalette {
        &self.palette
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> Option<&Notice> {
        self.status_message.as_ref()
    }

    pub fn take_status(&mut self) -> Option<Notice> {
        self.status_message.take()
    }

    // -- ingestion --

    /// Replace the dataset. Filters and charts are reset and every row is
    /// visible. On error the session is left exactly as it was.
    pub fn ingest(&mut self, table: ParsedTable) -> Result<()> {
        let columns = match infer_schema(&table.header) {
            Ok(columns) => columns,
            Err(e) => return self.fail(e.into()),
        };

        let axes = default_axes(&columns);
        self.column_kinds = infer_kinds(&columns, &table.rows);
        self.dataset = Dataset {
            columns,
            rows: table.rows,
        };
        self.filters = FilterSet::new();
        self.charts.clear();
        self.filtered_rows = self.dataset.rows.clone();
        self.generation += 1;

        info!(
            "ingested {} rows x {} columns (generation {})",
            self.dataset.len(),
            self.dataset.columns.len(),
            self.generation
        );

        match axes {
            Ok((x, y)) => {
                self.x_axis = Some(x);
                self.y_axis = Some(y);
                self.notify(
                    NoticeLevel::Success,
                    format!("Loaded {} rows", self.dataset.len()),
                );
            }
            Err(e) => {
                self.x_axis = None;
                self.y_axis = None;
                warn!("{e}");
                self.notify(NoticeLevel::Warning, e.to_string());
            }
        }
        Ok(())
    }

    pub fn ingest_file(&mut self, path: &Path) -> Result<()> {
        match load_file(path) {
            Ok(table) => self.ingest(table),
            Err(e) => self.fail(e),
        }
    }

    pub fn ingest_bytes(&mut self, bytes: &[u8], delimiter: u8) -> Result<()> {
        match parse_delimited(bytes, delimiter) {
            Ok(table) => self.ingest(table),
            Err(e) => self.fail(e),
        }
    }

    // -- filters --

    /// Insert or overwrite a filter slot and recompute the filtered rows.
    ///
    /// Active specs must target a known column.
    pub fn set_filter(&mut self, slot: &str, spec: FilterSpec) -> Result<()> {
        if spec.is_active() {
            if let Err(e) = require_column(self.columns(), &spec.column) {
                return self.fail(e);
            }
        }
        self.filters.insert(slot, spec);
        self.refilter();
        Ok(())
    }

    /// Change the operand of an existing slot, or of one of the built-in
    /// slots (`date`, `region`, `productType`, `discount`, `returnRate`).
    pub fn set_filter_operand(&mut self, slot: &str, operand: &str) -> Result<()> {
        let spec = self
            .filters
            .get(slot)
            .cloned()
            .or_else(|| FilterSet::reference_slot(slot));
        match spec {
            Some(mut spec) => {
                spec.operand = operand.to_string();
                self.set_filter(slot, spec)
            }
            None => self.fail(Error::UnknownFilter(slot.to_string())),
        }
    }

    pub fn clear_filter(&mut self, slot: &str) {
        if self.filters.remove(slot).is_some() {
            self.refilter();
        }
    }

    /// Recompute `filtered_rows` after a filter or dataset change.
    fn refilter(&mut self) {
        self.filtered_rows = apply_filters(&self.dataset.rows, &self.filters);
        debug!(
            "refilter: {} of {} rows visible",
            self.filtered_rows.len(),
            self.dataset.len()
        );
    }

    // -- charts --

    pub fn select_x_axis(&mut self, column: &str) -> Result<()> {
        if let Err(e) = require_column(self.columns(), column) {
            return self.fail(e);
        }
        self.x_axis = Some(column.to_string());
        Ok(())
    }

    pub fn select_y_axis(&mut self, column: &str) -> Result<()> {
        if let Err(e) = require_column(self.columns(), column) {
            return self.fail(e);
        }
        self.y_axis = Some(column.to_string());
        Ok(())
    }

    pub fn select_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }

    /// Append a chart for the selected axes and kind.
    ///
    /// Returns `Ok(false)` without doing anything while an axis is unset.
    pub fn add_chart(&mut self) -> Result<bool> {
        let (Some(x), Some(y)) = (&self.x_axis, &self.y_axis) else {
            return Ok(false);
        };
        let spec = ChartSpec::new(x, y, self.chart_kind);
        for column in [&spec.x_column, &spec.y_column] {
            if let Err(e) = require_column(self.columns(), column) {
                return self.fail(e);
            }
        }
        debug!("add chart {} {} vs {}", spec.kind, spec.y_column, spec.x_column);
        self.charts.push(spec);
        Ok(true)
    }

    /// Project every configured chart over the filtered rows, in chart order.
    pub fn chart_series(&self) -> Vec<Result<Series>> {
        self.charts
            .iter()
            .map(|spec| project(self.columns(), &self.filtered_rows, spec, &self.palette))
            .collect()
    }

    pub fn table(&self) -> TableView {
        TableView::new(self.columns(), &self.filtered_rows)
    }

    // -- export --

    pub fn export_csv(&self) -> Result<String> {
        to_csv(self.columns(), &self.filtered_rows)
    }

    pub fn export_json(&self) -> Result<String> {
        to_json(self.columns(), &self.filtered_rows)
    }

    pub fn submit(&mut self, store: &dyn ConfigStore) -> Result<MessageResponse> {
        let request = SubmitRequest {
            filtered_data: OrderedRows {
                columns: &self.dataset.columns,
                rows: &self.filtered_rows,
            },
        };
        match store.submit(&request) {
            Ok(response) => {
                self.notify(NoticeLevel::Success, response.message.clone());
                Ok(response)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    // -- configuration persistence --

    pub fn begin_load(&self, user_id: &str) -> PendingLoad {
        PendingLoad {
            generation: self.generation,
            user_id: user_id.to_string(),
        }
    }

    /// Apply the result of a load issued with [`Self::begin_load`].
    ///
    /// Filters and charts are replaced together; a NotFound result empties
    /// both. A result that arrives after a newer dataset was ingested is
    /// discarded.
    pub fn complete_load(
        &mut self,
        pending: PendingLoad,
        result: Result<Option<Configuration>, StoreError>,
    ) -> Result<LoadOutcome> {
        if pending.generation != self.generation {
            warn!(
                "discarding load for {} issued at generation {} (now {})",
                pending.user_id, pending.generation, self.generation
            );
            return Ok(LoadOutcome::Stale);
        }
        match result {
            Ok(Some(Configuration { filters, charts })) => {
                (self.filters, self.charts) = (filters, charts);
                self.refilter();
                info!(
                    "loaded configuration for {}: {} filters, {} charts",
                    pending.user_id,
                    self.filters.len(),
                    self.charts.len()
                );
                self.notify(NoticeLevel::Info, "Configuration loaded");
                Ok(LoadOutcome::Applied)
            }
            Ok(None) => {
                (self.filters, self.charts) = (FilterSet::new(), Vec::new());
                self.refilter();
                info!("no saved configuration for {}", pending.user_id);
                Ok(LoadOutcome::NotFound)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    pub fn load_configuration(
        &mut self,
        store: &dyn ConfigStore,
        user_id: &str,
    ) -> Result<LoadOutcome> {
        let pending = self.begin_load(user_id);
        let result = store.load(user_id);
        self.complete_load(pending, result)
    }

    pub fn begin_save(&self, user_id: &str) -> PendingSave {
        PendingSave {
            generation: self.generation,
            request: UserConfiguration::new(user_id, self.filters.clone(), self.charts.clone()),
        }
    }

    /// Report the result of a save issued with [`Self::begin_save`].
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: Result<MessageResponse, StoreError>,
    ) -> Result<MessageResponse> {
        if pending.generation != self.generation {
            debug!(
                "save for {} finished after a newer dataset was ingested",
                pending.request.user_id
            );
        }
        match result {
            Ok(response) => {
                self.notify(NoticeLevel::Success, response.message.clone());
                Ok(response)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    pub fn save_configuration(
        &mut self,
        store: &dyn ConfigStore,
        user_id: &str,
    ) -> Result<MessageResponse> {
        let pending = self.begin_save(user_id);
        let result = store.save(&pending.request);
        self.complete_save(pending, result)
    }

    // -- notices --

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.status_message = Some(Notice::new(level, message));
    }

    fn fail<T>(&mut self, error: Error) -> Result<T> {
        warn!("{error}");
        self.notify(NoticeLevel::Error, error.to_string());
        Err(error)
    }
}
