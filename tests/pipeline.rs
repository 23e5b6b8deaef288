//! End-to-end checks over the 12-month sample dataset: load, summarize,
//! correlate, report, and drive the menu with scripted input.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use datavis::analysis::{CorrelationMatrix, SummaryStats};
use datavis::config::Settings;
use datavis::data::loader::load_file;
use datavis::data::model::Metric;
use datavis::menu;
use datavis::output::{ArtifactKind, FileNamer};
use datavis::render::{self, ChartKind, ChartOptions};
use datavis::session::Session;
use datavis::DataVisError;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SAMPLE: &str = "\
Month,Sales,Expenses,Profit,Customers
Jan,100,70,30,50
Feb,110,74,36,54
Mar,120,80,40,57
Apr,130,83,47,63
May,140,90,50,66
Jun,150,94,56,70
Jul,160,99,61,75
Aug,170,105,65,78
Sep,180,108,72,84
Oct,190,115,75,88
Nov,200,120,80,91
Dec,210,124,86,97
";

fn write_sample(dir: &Path, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("sample_data.csv");
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap_or_default()
}

#[test]
fn sales_growth_matches_hand_computation() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ds = load_file(&write_sample(dir.path(), SAMPLE)?)?;
    assert_eq!(ds.len(), 12);

    let stats = SummaryStats::compute(&ds)?;
    let sales = stats.metric(Metric::Sales).ok_or("no Sales summary")?;
    // (210 - 100) / 100 * 100
    let growth = sales.growth.ok_or("no growth")?;
    assert!((growth - 110.0).abs() < 1e-9, "growth was {growth}");
    assert_eq!(sales.min, 100.0);
    assert_eq!(sales.max, 210.0);
    assert_eq!(sales.mean, 155.0);
    Ok(())
}

#[test]
fn sales_correlates_exactly_with_itself() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ds = load_file(&write_sample(dir.path(), SAMPLE)?)?;
    let corr = CorrelationMatrix::compute(&ds)?;
    assert_eq!(corr.get("Sales", "Sales"), Some(1.0));
    assert_eq!(corr.len(), 4);
    let r = corr.get("Sales", "Customers").ok_or("missing pair")?;
    assert!(r > 0.9, "sales and customers should move together, got {r}");
    Ok(())
}

#[test]
fn missing_column_yields_no_dataset() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_sample(dir.path(), "Month,Sales,Expenses,Profit\nJan,1,2,3\n")?;
    match load_file(&path) {
        Err(DataVisError::MissingColumn { column }) => assert_eq!(column, "Customers"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
    Ok(())
}

#[test]
fn menu_reprompts_previews_and_saves_report() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ds = load_file(&write_sample(dir.path(), SAMPLE)?)?;
    let settings = Settings {
        output_dir: dir.path().join("plots"),
        ..Settings::default()
    };
    let mut session = Session::new(ds, settings).with_clock(fixed_clock);

    let input = Cursor::new("hello\n7\n8\n9\n");
    let mut out = Vec::new();
    menu::run(&mut session, input, &mut out)?;
    let text = String::from_utf8(out)?;

    assert!(text.contains("Please enter a number between 1 and 9."));
    assert!(text.contains("DATA PREVIEW"));
    assert!(text.contains("✓ Analysis report saved as:"));
    assert!(text.contains("Thank you for using DataVisualizer!"));

    assert_eq!(session.reports.len(), 1);
    let report_path = dir.path().join("plots/report_20240601_093000.txt");
    let report = std::fs::read_to_string(report_path)?;
    assert!(report.contains("- Sales Growth: 110.0%"));
    assert!(report.contains("- Time period: Jan to Dec"));
    assert!(report.contains("- Peak Sales Month: Dec ($210)"));
    Ok(())
}

#[test]
fn end_of_input_behaves_like_quit() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ds = load_file(&write_sample(dir.path(), SAMPLE)?)?;
    let settings = Settings {
        output_dir: dir.path().join("plots"),
        ..Settings::default()
    };
    let mut session = Session::new(ds, settings);
    let mut out = Vec::new();
    menu::run(&mut session, Cursor::new(""), &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("Thank you for using DataVisualizer!"));
    // Nothing was charted, so no automatic report.
    assert!(session.reports.is_empty());
    Ok(())
}

#[test]
fn every_chart_renders_the_sample_at_full_resolution() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ds = load_file(&write_sample(dir.path(), SAMPLE)?)?;
    let mut namer = FileNamer::new(dir.path().join("plots"));
    let opts = ChartOptions::default();
    assert_eq!(opts.dpi, 300);

    let results = render::render_all(&ds, &mut namer, &opts, fixed_clock());
    assert_eq!(results.len(), ChartKind::ALL.len());

    for (kind, result) in results {
        let artifact = result.map_err(|e| format!("{kind} failed: {e}"))?;
        assert_eq!(artifact.kind, ArtifactKind::Chart);
        assert_eq!(
            artifact.file_name(),
            format!("{}_20240601_093000.png", kind.tag())
        );

        let (w_in, h_in) = kind.figure_size();
        let expected = (
            (w_in * opts.dpi as f64).round() as u32,
            (h_in * opts.dpi as f64).round() as u32,
        );
        let img = image::open(&artifact.path)?;
        assert_eq!((img.width(), img.height()), expected, "{kind} size");

        let reader = png::Decoder::new(std::fs::File::open(&artifact.path)?).read_info()?;
        let dims = reader.info().pixel_dims.ok_or("missing pHYs chunk")?;
        assert_eq!((dims.xppu as f64 * 0.0254).round(), 300.0, "{kind} density");
    }
    Ok(())
}

#[test]
fn generate_all_then_quit_reports_five_charts() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ds = load_file(&write_sample(dir.path(), SAMPLE)?)?;
    let settings = Settings {
        output_dir: dir.path().join("plots"),
        dpi: 60,
        ..Settings::default()
    };
    let mut session = Session::new(ds, settings).with_clock(fixed_clock);

    let mut out = Vec::new();
    menu::run(&mut session, Cursor::new("6\n9\n"), &mut out)?;
    let text = String::from_utf8(out)?;

    assert!(text.contains("✓ All visualizations generated!"), "{text}");
    assert_eq!(session.charts.len(), 5);
    assert_eq!(session.reports.len(), 1);

    let report = std::fs::read_to_string(&session.reports[0].path)?;
    for (i, kind) in ChartKind::ALL.iter().enumerate() {
        let line = format!("{}. {}_20240601_093000.png", i + 1, kind.tag());
        assert!(report.contains(&line), "report is missing '{line}'");
    }
    Ok(())
}
