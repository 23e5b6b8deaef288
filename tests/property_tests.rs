//! Property-based tests for the statistics and naming layers.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};
use datavis::analysis::stats::growth_rate;
use datavis::analysis::{CorrelationMatrix, SummaryStats};
use datavis::data::model::{Dataset, Metric, Series};
use datavis::output::FileNamer;
use proptest::prelude::*;

/// Realistic business values: non-negative, finite, modest magnitude.
fn column(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1_000_000.0, len)
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    (2usize..24).prop_flat_map(|rows| {
        (column(rows), column(rows), column(rows), column(rows)).prop_map(move |(s, e, p, c)| {
            Dataset {
                source: PathBuf::from("generated.csv"),
                column_names: std::iter::once("Month")
                    .chain(Metric::ALL.iter().map(|m| m.column()))
                    .map(String::from)
                    .collect(),
                labels: (0..rows).map(|i| format!("M{i}")).collect(),
                numeric: vec![
                    Series::new("Sales", s),
                    Series::new("Expenses", e),
                    Series::new("Profit", p),
                    Series::new("Customers", c),
                ],
            }
        })
    })
}

fn timestamp(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn mean_lies_between_min_and_max(ds in dataset_strategy()) {
        let stats = SummaryStats::compute(&ds).expect("non-empty dataset");
        for col in &stats.columns {
            // Allow for rounding in the running sum.
            let eps = 1e-9 * col.max.abs().max(1.0);
            prop_assert!(col.min - eps <= col.mean && col.mean <= col.max + eps,
                "{}: {} not in [{}, {}]", col.name, col.mean, col.min, col.max);
        }
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal(ds in dataset_strategy()) {
        let m = CorrelationMatrix::compute(&ds).expect("at least two rows");
        for i in 0..m.len() {
            prop_assert_eq!(m.values[i][i], 1.0);
            for j in 0..m.len() {
                prop_assert_eq!(m.values[i][j].to_bits(), m.values[j][i].to_bits());
                let r = m.values[i][j];
                prop_assert!(r.is_nan() || (-1.0..=1.0).contains(&r));
            }
        }
    }

    #[test]
    fn growth_rate_never_panics(values in prop::collection::vec(-1e6f64..1e6, 0..16)) {
        let growth = growth_rate(&values);
        if values.len() < 2 || values[0] == 0.0 {
            prop_assert_eq!(growth, None);
        } else {
            prop_assert!(growth.is_some_and(f64::is_finite));
        }
    }

    #[test]
    fn zero_start_gives_sentinel(rest in prop::collection::vec(0.0f64..1e6, 1..16)) {
        let mut values = vec![0.0];
        values.extend(rest);
        prop_assert_eq!(growth_rate(&values), None);
    }

    #[test]
    fn namer_separates_tags_and_seconds(
        secs in 0i64..4_000_000_000,
        a in "[a-z]{1,10}",
        b in "[a-z]{1,10}",
    ) {
        prop_assume!(a != b);
        let mut namer = FileNamer::new("plots");
        let t = timestamp(secs);
        prop_assert_ne!(namer.next_path(&a, t, "png"), namer.next_path(&b, t, "png"));

        let mut fresh = FileNamer::new("plots");
        prop_assert_ne!(
            fresh.next_path(&a, t, "png"),
            fresh.next_path(&a, timestamp(secs + 1), "png")
        );
    }
}
