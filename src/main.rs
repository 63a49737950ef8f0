use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{info, warn};

use rowboard::chart::{ChartKind, ChartSpec, aggregate_by_x};
use rowboard::data::export::{CSV_FILE_NAME, JSON_FILE_NAME, write_artifact};
use rowboard::data::filter::{FilterKind, FilterSpec};
use rowboard::settings::{DEFAULT_USER_ID, Settings};
use rowboard::state::{LoadOutcome, NoticeLevel, SessionState};

#[derive(Parser, Debug)]
#[command(version, about = "Filter a delimited dataset and project it into charts")]
struct Args {
    /// Dataset to load (.csv, .tsv, .tab or .psv)
    path: PathBuf,

    /// User id the configuration is saved and loaded under
    #[arg(long, env = "ROWBOARD_USER", default_value = DEFAULT_USER_ID)]
    user: String,

    /// Directory of the configuration store
    #[arg(long = "store-dir", env = "ROWBOARD_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Use an evenly spaced palette with this many colours
    #[arg(long = "palette-size")]
    palette_size: Option<usize>,

    /// Restore the saved filters and charts before applying other flags
    #[arg(long, action)]
    load: bool,

    /// Set a built-in filter slot, e.g. `region=EU` or `discount=6`
    #[arg(long = "set", value_name = "SLOT=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Add a custom filter slot: `SLOT=KIND:COLUMN:OPERAND` (kind: substring, min, max)
    #[arg(long = "filter", value_name = "SLOT=KIND:COLUMN:OPERAND", value_parser = parse_filter)]
    filter: Vec<(String, FilterSpec)>,

    /// Add a chart: `X,Y[,KIND]` (kind: bar, line, pie)
    #[arg(long = "chart", value_name = "X,Y[,KIND]", value_parser = parse_chart)]
    chart: Vec<ChartSpec>,

    /// Sum y values per distinct x before printing charts
    #[arg(long, action)]
    aggregate: bool,

    /// Number of table rows to print
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Save the resulting filters and charts
    #[arg(long, action)]
    save: bool,

    /// Submit the filtered rows to the store
    #[arg(long, action)]
    submit: bool,

    /// Export the filtered rows as CSV
    #[arg(long = "export-csv", value_name = "PATH", num_args = 0..=1, default_missing_value = CSV_FILE_NAME)]
    export_csv: Option<PathBuf>,

    /// Export the filtered rows as JSON
    #[arg(long = "export-json", value_name = "PATH", num_args = 0..=1, default_missing_value = JSON_FILE_NAME)]
    export_json: Option<PathBuf>,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        let mut settings = Settings {
            user_id: args.user.clone(),
            palette_size: args.palette_size,
            ..Settings::default()
        };
        if let Some(dir) = &args.store_dir {
            settings.store_dir = dir.clone();
        }
        settings
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (slot, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=VALUE, got '{s}'"))?;
    Ok((slot.to_string(), value.to_string()))
}

fn parse_filter(s: &str) -> Result<(String, FilterSpec), String> {
    let (slot, rest) = parse_assignment(s)?;
    let mut parts = rest.splitn(3, ':');
    let (Some(kind), Some(column), Some(operand)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected KIND:COLUMN:OPERAND, got '{rest}'"));
    };
    let kind: FilterKind = kind.parse()?;
    Ok((slot, FilterSpec::new(kind, column, operand)))
}

fn parse_chart(s: &str) -> Result<ChartSpec, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y] => Ok(ChartSpec::new(x, y, ChartKind::default())),
        [x, y, kind] => Ok(ChartSpec::new(x, y, kind.parse()?)),
        _ => Err(format!("expected X,Y[,KIND], got '{s}'")),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::from(&args);
    let store = settings.store();
    info!("configuration store at {}", store.root().display());
    let mut session = SessionState::new(settings.palette());

    session
        .ingest_file(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    if let Some(notice) = session.take_status() {
        if notice.level == NoticeLevel::Warning {
            warn!("{}", notice.message);
        }
    }

    if args.load {
        match session.load_configuration(&store, &settings.user_id)? {
            LoadOutcome::Applied => info!("restored configuration for {}", settings.user_id),
            LoadOutcome::NotFound | LoadOutcome::Stale => {}
        }
    }

    for (slot, value) in &args.set {
        session.set_filter_operand(slot, value)?;
    }
    for (slot, spec) in &args.filter {
        session.set_filter(slot, spec.clone())?;
    }
    for spec in &args.chart {
        session.select_x_axis(&spec.x_column)?;
        session.select_y_axis(&spec.y_column)?;
        session.select_chart_kind(spec.kind);
        if !session.add_chart()? {
            return Err(anyhow!("could not add chart {} / {}", spec.x_column, spec.y_column));
        }
    }

    println!("Columns:");
    for (col, kind) in session.columns().iter().zip(session.column_kinds()) {
        println!("  {} ({kind})", col.display_label);
    }
    let table = session.table();
    println!();
    println!(
        "{} of {} rows after filtering",
        table.row_count(),
        session.dataset().len()
    );
    print!("{}", table.render_text(args.rows));

    for series in session.chart_series() {
        let mut series = series?;
        if args.aggregate {
            series = aggregate_by_x(&series, session.palette());
        }
        println!();
        println!("{}", serde_json::to_string_pretty(&series)?);
    }

    if args.save {
        let response = session.save_configuration(&store, &settings.user_id)?;
        println!("{}", response.message);
    }
    if args.submit {
        let response = session.submit(&store)?;
        println!("{}", response.message);
    }
    if let Some(path) = &args.export_csv {
        write_artifact(path, &session.export_csv()?)?;
    }
    if let Some(path) = &args.export_json {
        write_artifact(path, &session.export_json()?)?;
    }

    Ok(())
}
