/// Descriptive statistics derived from a loaded [`Dataset`](crate::data::model::Dataset).
///
/// Everything here is recomputed on demand and never mutates the dataset.
pub mod correlation;
pub mod fit;
pub mod stats;

pub use correlation::CorrelationMatrix;
pub use stats::{ColumnSummary, Describe, Kpis, SummaryStats};
