use crate::data::model::{Dataset, Metric, Series};
use crate::error::{DataVisError, Result};

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Percentage change from the first to the last value.
///
/// Returns `None` when there are fewer than two values or the first value is
/// zero; callers render that as `N/A`.
pub fn growth_rate(values: &[f64]) -> Option<f64> {
    let (&first, &last) = (values.first()?, values.last()?);
    if values.len() < 2 || first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

// ---------------------------------------------------------------------------
// SummaryStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Growth in percent, `None` when undefined.
    pub growth: Option<f64>,
}

impl ColumnSummary {
    fn compute(series: &Series) -> Option<Self> {
        let values = &series.values;
        Some(ColumnSummary {
            name: series.name.clone(),
            count: values.len(),
            total: sum(values),
            mean: mean(values)?,
            min: min(values)?,
            max: max(values)?,
            growth: growth_rate(values),
        })
    }
}

/// Per-column summary of every numeric column, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryStats {
    pub fn compute(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(DataVisError::Computation(
                "cannot summarize an empty dataset".into(),
            ));
        }
        let columns = dataset
            .numeric
            .iter()
            .filter_map(ColumnSummary::compute)
            .collect();
        Ok(SummaryStats { columns })
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn metric(&self, metric: Metric) -> Option<&ColumnSummary> {
        self.get(metric.column())
    }
}

// ---------------------------------------------------------------------------
// Kpis – headline business figures for the report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
    pub avg_sales: f64,
    pub avg_profit: f64,
    pub peak_sales: Option<(String, f64)>,
    pub peak_profit: Option<(String, f64)>,
    pub sales_growth: Option<f64>,
    pub customer_growth: Option<f64>,
    /// `mean(Profit) / mean(Sales)` in percent.
    pub profit_margin: Option<f64>,
}

impl Kpis {
    pub fn compute(dataset: &Dataset) -> Result<Self> {
        let sales = dataset.metric(Metric::Sales);
        let profit = dataset.metric(Metric::Profit);
        let (avg_sales, avg_profit) = match (mean(sales), mean(profit)) {
            (Some(s), Some(p)) => (s, p),
            _ => {
                return Err(DataVisError::Computation(
                    "no rows to compute key metrics from".into(),
                ))
            }
        };
        let peak = |m| dataset.peak(m).map(|(label, v)| (label.to_string(), v));

        Ok(Kpis {
            total_sales: sum(sales),
            total_expenses: sum(dataset.metric(Metric::Expenses)),
            total_profit: sum(profit),
            avg_sales,
            avg_profit,
            peak_sales: peak(Metric::Sales),
            peak_profit: peak(Metric::Profit),
            sales_growth: growth_rate(sales),
            customer_growth: growth_rate(dataset.metric(Metric::Customers)),
            profit_margin: (avg_sales != 0.0).then(|| avg_profit / avg_sales * 100.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Describe – pandas-style `describe()` table for the preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeRow {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// `None` for a single row.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub rows: Vec<DescribeRow>,
}

impl Describe {
    pub fn compute(dataset: &Dataset) -> Self {
        let rows = dataset
            .numeric
            .iter()
            .filter_map(|s| {
                let v = &s.values;
                Some(DescribeRow {
                    name: s.name.clone(),
                    count: v.len(),
                    mean: mean(v)?,
                    std: std_dev(v),
                    min: min(v)?,
                    q25: quantile(v, 0.25)?,
                    median: quantile(v, 0.5)?,
                    q75: quantile(v, 0.75)?,
                    max: max(v)?,
                })
            })
            .collect();
        Describe { rows }
    }
}
