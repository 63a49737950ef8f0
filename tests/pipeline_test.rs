use std::fs;

use rowboard::chart::ChartKind;
use rowboard::data::filter::{FilterKind, FilterSpec};
use rowboard::data::loader::load_file;
use rowboard::error::Error;
use rowboard::state::{LoadOutcome, NoticeLevel, SessionState};
use rowboard::store::{ConfigStore, FileStore};
use tempfile::TempDir;

const SALES: &str = "\
Date,Region,Product_Type,Discount_Percent,Return_Rate,Sales
2024-01-01,EU,Electronics,10,2.5,1200
2024-01-01,US,Clothing,5,8.0,300
2024-02-01,EU,Clothing,20,n/a,450
2024-02-01,APAC,Home,15,4.0,800
";

fn setup() -> (TempDir, FileStore, SessionState) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("sales.csv");
    fs::write(&path, SALES).unwrap();

    let store = FileStore::new(dir.path().join("store"));
    let mut session = SessionState::default();
    session.ingest_file(&path).unwrap();
    (dir, store, session)
}

#[test]
fn test_reference_slots_cover_sales_columns() {
    let (_dir, _store, mut session) = setup();

    session.set_filter_operand("region", "EU").unwrap();
    session.set_filter_operand("discount", "15").unwrap();
    session.set_filter_operand("returnRate", "5").unwrap();

    // Row 3 has an unparseable return rate, which counts as 0.
    let dates: Vec<&str> = session
        .filtered_rows()
        .iter()
        .map(|r| r.get("Date"))
        .collect();
    assert_eq!(dates, vec!["2024-02-01"]);
}

#[test]
fn test_custom_slot_and_charts_survive_restart() {
    let (dir, store, mut session) = setup();

    session
        .set_filter(
            "bigSales",
            FilterSpec::new(FilterKind::NumericMin, "Sales", "400"),
        )
        .unwrap();
    session.select_x_axis("Region").unwrap();
    session.select_y_axis("Sales").unwrap();
    session.select_chart_kind(ChartKind::Pie);
    session.add_chart().unwrap();
    session.select_chart_kind(ChartKind::Line);
    session.add_chart().unwrap();
    session.save_configuration(&store, "analyst").unwrap();

    let mut restored = SessionState::default();
    restored.ingest_file(&dir.path().join("sales.csv")).unwrap();
    assert_eq!(
        restored.load_configuration(&store, "analyst").unwrap(),
        LoadOutcome::Applied
    );
    assert_eq!(restored.charts(), session.charts());
    assert_eq!(restored.filtered_rows(), session.filtered_rows());

    let series: Vec<_> = restored
        .chart_series()
        .into_iter()
        .map(|s| s.unwrap())
        .collect();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].len(), restored.filtered_rows().len());
    assert!(series[0].points.iter().all(|p| p.color.is_some()));
    assert!(series[1].points.iter().all(|p| p.color.is_none()));
}

#[test]
fn test_legacy_configuration_document_loads() {
    let (_dir, store, mut session) = setup();
    let path = store.config_path("user123");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"filters":{},"charts":[{"xAxis":"Date","yAxis":"Sales","chartType":"BarChart"}]}"#,
    )
    .unwrap();

    assert_eq!(
        session.load_configuration(&store, "user123").unwrap(),
        LoadOutcome::Applied
    );
    assert_eq!(session.charts()[0].kind, ChartKind::Bar);
    assert_eq!(session.chart_series()[0].as_ref().unwrap().points[0].y, 1200.0);
}

#[test]
fn test_chart_on_vanished_column_reports_unknown_column() {
    let (dir, store, mut session) = setup();
    session.select_y_axis("Sales").unwrap();
    session.add_chart().unwrap();
    session.save_configuration(&store, "u1").unwrap();

    let narrow = dir.path().join("narrow.csv");
    fs::write(&narrow, "Date,Region\n2024-01-01,EU\n").unwrap();
    session.ingest_file(&narrow).unwrap();
    session.load_configuration(&store, "u1").unwrap();

    assert!(matches!(
        &session.chart_series()[0],
        Err(Error::UnknownColumn(c)) if c == "Sales"
    ));
}

#[test]
fn test_exports_and_submission() {
    let (dir, store, mut session) = setup();
    session.set_filter_operand("productType", "Clothing").unwrap();

    let csv = session.export_csv().unwrap();
    assert!(csv.starts_with("Date,Region,Product_Type,Discount_Percent,Return_Rate,Sales\n"));
    assert_eq!(csv.lines().count(), 3);

    let exported = dir.path().join("filtered.csv");
    fs::write(&exported, &csv).unwrap();
    let reparsed = load_file(&exported).unwrap();
    assert_eq!(reparsed.rows, session.filtered_rows());

    let json: serde_json::Value = serde_json::from_str(&session.export_json().unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["Return_Rate"], "n/a");

    session.submit(&store).unwrap();
    let submitted: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.submission_path()).unwrap()).unwrap();
    assert_eq!(submitted["filteredData"], json);
}

#[test]
fn test_bad_files_do_not_disturb_session() {
    let (dir, store, mut session) = setup();
    session.set_filter_operand("region", "EU").unwrap();

    let ragged = dir.path().join("ragged.csv");
    fs::write(&ragged, "a,b\n1\n").unwrap();
    assert!(matches!(
        session.ingest_file(&ragged),
        Err(Error::Ingestion(_))
    ));
    assert!(matches!(
        session.ingest_file(&dir.path().join("data.parquet")),
        Err(Error::UnsupportedFormat(_))
    ));
    assert_eq!(session.filtered_rows().len(), 2);
    assert_eq!(session.status().unwrap().level, NoticeLevel::Error);
    assert_eq!(store.load("nobody").unwrap(), None);
}
