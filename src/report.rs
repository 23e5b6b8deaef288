use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::analysis::correlation::Pair;
use crate::analysis::stats::DescribeRow;
use crate::analysis::{CorrelationMatrix, Describe, Kpis, SummaryStats};
use crate::data::model::Dataset;
use crate::error::Result;
use crate::output::{Artifact, ArtifactKind, FileNamer};
use crate::render::canvas::money;

const RULE_WIDTH: usize = 60;
const PREVIEW_ROWS: usize = 5;

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}%"))
}

/// Everything the analysis report is assembled from.
pub struct ReportInput<'a> {
    pub dataset: &'a Dataset,
    pub summary: &'a SummaryStats,
    pub kpis: &'a Kpis,
    pub correlations: &'a CorrelationMatrix,
    pub correlation_threshold: f64,
    pub charts: &'a [Artifact],
    pub generated_at: NaiveDateTime,
}

/// Gather the statistics a report needs. Correlation needs at least two rows.
pub fn analyze(dataset: &Dataset) -> Result<(SummaryStats, Kpis, CorrelationMatrix)> {
    Ok((
        SummaryStats::compute(dataset)?,
        Kpis::compute(dataset)?,
        CorrelationMatrix::compute(dataset)?,
    ))
}

/// Plain-text analysis report.
pub fn generate_report(input: &ReportInput<'_>) -> String {
    input.to_string()
}

impl fmt::Display for ReportInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DATA ANALYSIS REPORT")?;
        writeln!(
            f,
            "Generated on: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "{}\n", rule('='))?;

        self.write_overview(f)?;
        self.write_key_metrics(f)?;
        self.write_growth(f)?;
        self.write_summary_table(f)?;
        self.write_correlations(f)?;
        self.write_visualizations(f)
    }
}

impl ReportInput<'_> {
    fn write_overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DATASET OVERVIEW:")?;
        writeln!(f, "- Source: {}", self.dataset.source.display())?;
        writeln!(f, "- Total records: {}", self.dataset.len())?;
        if let Some((first, last)) = self.dataset.period() {
            writeln!(f, "- Time period: {first} to {last}")?;
        }
        writeln!(f)
    }

    fn write_key_metrics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let k = self.kpis;
        writeln!(f, "KEY METRICS:")?;
        writeln!(f, "- Total Sales: {}", money(k.total_sales))?;
        writeln!(f, "- Total Expenses: {}", money(k.total_expenses))?;
        writeln!(f, "- Total Profit: {}", money(k.total_profit))?;
        writeln!(f, "- Average Monthly Sales: {}", money(k.avg_sales))?;
        writeln!(f, "- Average Monthly Profit: {}", money(k.avg_profit))?;
        if let Some((month, value)) = &k.peak_sales {
            writeln!(f, "- Peak Sales Month: {month} ({})", money(*value))?;
        }
        if let Some((month, value)) = &k.peak_profit {
            writeln!(f, "- Peak Profit Month: {month} ({})", money(*value))?;
        }
        writeln!(f)
    }

    fn write_growth(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GROWTH ANALYSIS:")?;
        writeln!(f, "- Sales Growth: {}", percent(self.kpis.sales_growth))?;
        writeln!(f, "- Customer Growth: {}", percent(self.kpis.customer_growth))?;
        writeln!(
            f,
            "- Profit Margin (Average): {}",
            percent(self.kpis.profit_margin)
        )?;
        writeln!(f)
    }

    fn write_summary_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "METRIC SUMMARY:")?;
        writeln!(
            f,
            "{:<12} {:>12} {:>12} {:>12} {:>10}",
            "Metric", "Mean", "Min", "Max", "Growth"
        )?;
        for col in &self.summary.columns {
            writeln!(
                f,
                "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>10}",
                col.name,
                col.mean,
                col.min,
                col.max,
                percent(col.growth)
            )?;
        }
        writeln!(f)
    }

    fn write_correlations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let threshold = self.correlation_threshold;
        writeln!(f, "NOTABLE CORRELATIONS (|r| >= {threshold:.2}):")?;
        let pairs = self.correlations.notable(threshold);
        if pairs.is_empty() {
            writeln!(f, "- none")?;
        }
        for Pair { a, b, r } in &pairs {
            let direction = if *r >= 0.0 { "positive" } else { "negative" };
            writeln!(f, "- {a} / {b}: {r:.2} ({direction})")?;
        }
        writeln!(f)
    }

    fn write_visualizations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GENERATED VISUALIZATIONS:")?;
        if self.charts.is_empty() {
            writeln!(f, "- none")?;
        }
        for (i, chart) in self.charts.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, chart.file_name())?;
        }
        Ok(())
    }
}

/// Write the report as `report_<timestamp>.txt`.
pub fn save_report(
    text: &str,
    namer: &mut FileNamer,
    now: NaiveDateTime,
) -> Result<Artifact> {
    namer.ensure_dir()?;
    let path: PathBuf = namer.next_path("report", now, "txt");
    std::fs::write(&path, text)?;
    log::info!("Report written to {}", path.display());
    Ok(Artifact {
        kind: ArtifactKind::Report,
        path,
    })
}

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

/// First rows, column types and the describe table.
pub fn format_preview(dataset: &Dataset) -> String {
    Preview(dataset).to_string()
}

/// Display adapter for the data preview.
pub struct Preview<'a>(pub &'a Dataset);

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dataset = self.0;
        writeln!(f, "{}\nDATA PREVIEW\n{}", rule('='), rule('='))?;
        write_head(f, dataset)?;

        writeln!(f, "\nData types:")?;
        for name in &dataset.column_names {
            let dtype = dataset.series(name).map_or("object", |s| s.type_name());
            writeln!(f, "{name:<12} {dtype}")?;
        }

        write_describe(f, &Describe::compute(dataset))?;
        writeln!(
            f,
            "\nShape: {} rows, {} columns",
            dataset.len(),
            dataset.column_names.len()
        )
    }
}

fn write_head(f: &mut fmt::Formatter<'_>, dataset: &Dataset) -> fmt::Result {
    let shown = PREVIEW_ROWS.min(dataset.len());
    writeln!(f, "\nFirst {shown} rows:")?;
    write!(f, "{:>4} {:>10}", "", "Month")?;
    for s in &dataset.numeric {
        write!(f, " {:>12}", s.name)?;
    }
    writeln!(f)?;
    for row in 0..shown {
        write!(f, "{row:>4} {:>10}", dataset.labels[row])?;
        for s in &dataset.numeric {
            let v = s.values[row];
            if s.integral {
                write!(f, " {:>12}", v as i64)?;
            } else {
                write!(f, " {v:>12.2}")?;
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_describe(f: &mut fmt::Formatter<'_>, describe: &Describe) -> fmt::Result {
    writeln!(f, "\nBasic statistics:")?;
    write!(f, "{:<6}", "")?;
    for row in &describe.rows {
        write!(f, " {:>12}", row.name)?;
    }
    writeln!(f)?;
    let stats: [(&str, fn(&DescribeRow) -> Option<f64>); 8] = [
        ("count", |r| Some(r.count as f64)),
        ("mean", |r| Some(r.mean)),
        ("std", |r| r.std),
        ("min", |r| Some(r.min)),
        ("25%", |r| Some(r.q25)),
        ("50%", |r| Some(r.median)),
        ("75%", |r| Some(r.q75)),
        ("max", |r| Some(r.max)),
    ];
    for (label, get) in stats {
        write!(f, "{label:<6}")?;
        for row in &describe.rows {
            match get(row) {
                Some(v) => write!(f, " {v:>12.2}")?,
                None => write!(f, " {:>12}", "NaN")?,
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Series;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        Dataset {
            source: PathBuf::from("sample_data.csv"),
            column_names: ["Month", "Sales", "Expenses", "Profit", "Customers"]
                .map(String::from)
                .to_vec(),
            labels: ["Jan", "Feb", "Mar"].map(String::from).to_vec(),
            numeric: vec![
                Series::new("Sales", vec![1000.0, 1500.0, 2000.0]),
                Series::new("Expenses", vec![800.0, 900.0, 1100.0]),
                Series::new("Profit", vec![200.0, 600.0, 900.0]),
                Series::new("Customers", vec![0.0, 12.0, 15.0]),
            ],
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("timestamp")
    }

    #[test]
    fn report_lists_metrics_growth_and_charts() {
        let ds = dataset();
        let (summary, kpis, correlations) = analyze(&ds).expect("analysis");
        let charts = vec![Artifact {
            kind: ArtifactKind::Chart,
            path: PathBuf::from("plots/line_plot_20240131_120000.png"),
        }];
        let text = generate_report(&ReportInput {
            dataset: &ds,
            summary: &summary,
            kpis: &kpis,
            correlations: &correlations,
            correlation_threshold: 0.7,
            charts: &charts,
            generated_at: noon(),
        });

        assert!(text.contains("Generated on: 2024-01-31 12:00:00"));
        assert!(text.contains("- Time period: Jan to Mar"));
        assert!(text.contains("- Total Sales: $4,500"));
        assert!(text.contains("- Peak Profit Month: Mar ($900)"));
        assert!(text.contains("- Sales Growth: 100.0%"));
        // Customers start at zero.
        assert!(text.contains("- Customer Growth: N/A"));
        assert!(text.contains("Sales / Profit"));
        assert!(text.contains("1. line_plot_20240131_120000.png"));
    }

    #[test]
    fn report_is_saved_with_timestamped_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut namer = FileNamer::new(dir.path().join("out"));
        let artifact = save_report("hello", &mut namer, noon()).expect("save");
        assert_eq!(artifact.file_name(), "report_20240131_120000.txt");
        assert_eq!(std::fs::read_to_string(&artifact.path).expect("read"), "hello");
    }

    #[test]
    fn preview_shows_rows_types_and_stats() {
        let text = format_preview(&dataset());
        assert!(text.contains("First 3 rows:"));
        assert!(text.contains(&format!("{:<12} object", "Month")));
        assert!(text.contains(&format!("{:<12} int64", "Sales")));
        assert!(text.contains("Shape: 3 rows, 5 columns"));
        assert!(text.contains("count"));
        assert!(text.contains("1500"));
    }
}
