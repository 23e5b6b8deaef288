use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::data::model::Dataset;
use crate::menu::Command;
use crate::output::{Artifact, FileNamer};
use crate::render::{self, ChartKind, ChartOptions};
use crate::report::{self, ReportInput};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one interactive run works with, independent of the menu I/O.
pub struct Session {
    /// Dataset loaded at startup; read-only afterwards.
    pub dataset: Dataset,

    pub settings: Settings,

    namer: FileNamer,

    /// Charts written so far, in order.
    pub charts: Vec<Artifact>,

    /// Reports written so far.
    pub reports: Vec<Artifact>,

    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl Session {
    pub fn new(dataset: Dataset, settings: Settings) -> Self {
        let namer = FileNamer::new(settings.output_dir.clone());
        Self {
            dataset,
            settings,
            namer,
            charts: Vec::new(),
            reports: Vec::new(),
            clock: local_now,
        }
    }

    /// Replace the wall clock used for file names and report headers.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    fn chart_options(&self) -> ChartOptions {
        ChartOptions::from(&self.settings)
    }

    /// Run one menu command. Operation failures are reported to `out` and
    /// never escape; only write failures on `out` do.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Chart(kind) => {
                generating_banner(out)?;
                self.chart(kind, out)?;
            }
            Command::All => {
                generating_banner(out)?;
                writeln!(out, "Generating all visualizations...")?;
                let now = (self.clock)();
                let opts = self.chart_options();
                let results = render::render_all(&self.dataset, &mut self.namer, &opts, now);
                let total = results.len();
                let mut ok = 0;
                for (kind, result) in results {
                    if self.record_chart(kind, result, out)? {
                        ok += 1;
                    }
                }
                if ok == total {
                    writeln!(out, "✓ All visualizations generated!")?;
                } else {
                    writeln!(out, "{ok} of {total} visualizations generated.")?;
                }
            }
            Command::Preview => {
                write!(out, "\n{}", report::format_preview(&self.dataset))?;
            }
            Command::Report => {
                self.write_report(out)?;
            }
            Command::Quit => {
                writeln!(out, "\nThank you for using DataVisualizer!")?;
                if !self.charts.is_empty() {
                    writeln!(
                        out,
                        "Your visualizations have been saved in the '{}' folder.",
                        self.namer.dir().display()
                    )?;
                    self.write_report(out)?;
                }
            }
        }
        Ok(())
    }

    fn chart<W: Write>(&mut self, kind: ChartKind, out: &mut W) -> Result<()> {
        let now = (self.clock)();
        let opts = self.chart_options();
        let result = render::render_chart(kind, &self.dataset, &mut self.namer, &opts, now);
        self.record_chart(kind, result, out)?;
        Ok(())
    }

    /// Report a chart outcome; returns whether it succeeded.
    fn record_chart<W: Write>(
        &mut self,
        kind: ChartKind,
        result: crate::error::Result<Artifact>,
        out: &mut W,
    ) -> Result<bool> {
        match result {
            Ok(artifact) => {
                writeln!(out, "✓ {kind} saved as: {artifact}")?;
                self.charts.push(artifact);
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to render {kind}: {e}");
                writeln!(out, "Error creating {kind}: {e}")?;
                Ok(false)
            }
        }
    }

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let (summary, kpis, correlations) = match report::analyze(&self.dataset) {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("Failed to analyze dataset: {e}");
                writeln!(out, "Error generating report: {e}")?;
                return Ok(());
            }
        };
        let now = (self.clock)();
        let text = report::generate_report(&ReportInput {
            dataset: &self.dataset,
            summary: &summary,
            kpis: &kpis,
            correlations: &correlations,
            correlation_threshold: self.settings.correlation_threshold,
            charts: &self.charts,
            generated_at: now,
        });
        match report::save_report(&text, &mut self.namer, now) {
            Ok(artifact) => {
                writeln!(out, "✓ Analysis report saved as: {artifact}")?;
                self.reports.push(artifact);
            }
            Err(e) => {
                log::error!("Failed to save report: {e}");
                writeln!(out, "Error saving report: {e}")?;
            }
        }
        Ok(())
    }
}

fn generating_banner<W: Write>(out: &mut W) -> Result<()> {
    let rule = "=".repeat(60);
    writeln!(out, "\n{rule}\nGENERATING VISUALIZATION...\n{rule}")?;
    Ok(())
}

/// Summary printed after a successful load.
pub fn describe_load<W: Write>(dataset: &Dataset, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "✓ Successfully loaded data from '{}'",
        dataset.source.display()
    )?;
    writeln!(
        out,
        "  Dataset shape: {} rows, {} columns",
        dataset.len(),
        dataset.column_names.len()
    )?;
    writeln!(out, "  Columns: {}", dataset.column_names.join(", "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Metric, Series};
    use std::path::PathBuf;

    fn empty_dataset() -> Dataset {
        Dataset {
            source: PathBuf::from("empty.csv"),
            column_names: vec!["Month".into()],
            labels: vec![],
            numeric: Metric::ALL
                .iter()
                .map(|m| Series::new(m.column(), vec![]))
                .collect(),
        }
    }

    fn session(dir: &std::path::Path) -> Session {
        let settings = Settings {
            output_dir: dir.to_path_buf(),
            ..Settings::default()
        };
        Session::new(empty_dataset(), settings)
    }

    #[test]
    fn failed_chart_is_reported_not_recorded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = session(dir.path());
        let mut out = Vec::new();
        s.execute(Command::Chart(ChartKind::Bar), &mut out).expect("execute");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Error creating Bar chart"));
        assert!(s.charts.is_empty());
    }

    #[test]
    fn report_on_empty_dataset_reports_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = session(dir.path());
        let mut out = Vec::new();
        s.execute(Command::Report, &mut out).expect("execute");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Error generating report"));
        assert!(s.reports.is_empty());
    }

    #[test]
    fn quit_without_charts_skips_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = session(dir.path());
        let mut out = Vec::new();
        s.execute(Command::Quit, &mut out).expect("execute");
        assert!(String::from_utf8(out).expect("utf8").contains("Thank you"));
        assert!(s.reports.is_empty());
    }

    #[test]
    fn describe_load_lists_columns() {
        let mut out = Vec::new();
        describe_load(&empty_dataset(), &mut out).expect("describe");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Dataset shape: 0 rows, 1 columns"));
        assert!(text.contains("Columns: Month"));
    }
}
