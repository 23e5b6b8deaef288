use crate::data::model::Dataset;
use crate::error::{DataVisError, Result};

use super::stats::mean;

/// Pearson correlation coefficient of two equally long series.
///
/// `None` when the series are shorter than two values, differ in length, or
/// either has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(xs)?, mean(ys)?);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Square matrix of pairwise correlations across the numeric columns.
///
/// Symmetric, with exactly `1.0` on the diagonal. Pairs involving a
/// constant column hold `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// One off-diagonal entry of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub a: String,
    pub b: String,
    pub r: f64,
}

impl CorrelationMatrix {
    pub fn compute(dataset: &Dataset) -> Result<Self> {
        if dataset.len() < 2 {
            return Err(DataVisError::Computation(format!(
                "correlation needs at least 2 rows, dataset has {}",
                dataset.len()
            )));
        }
        let series = &dataset.numeric;
        let n = series.len();
        let mut values = vec![vec![1.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let r = pearson(&series[i].values, &series[j].values).unwrap_or(f64::NAN);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Ok(CorrelationMatrix {
            names: series.iter().map(|s| s.name.clone()).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }

    /// Distinct pairs whose absolute correlation reaches `threshold`,
    /// strongest first.
    pub fn notable(&self, threshold: f64) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = (0..self.len())
            .flat_map(|i| ((i + 1)..self.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| self.values[i][j].abs() >= threshold)
            .map(|(i, j)| Pair {
                a: self.names[i].clone(),
                b: self.names[j].clone(),
                r: self.values[i][j],
            })
            .collect();
        pairs.sort_by(|x, y| y.r.abs().total_cmp(&x.r.abs()));
        pairs
    }
}
