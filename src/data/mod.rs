/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → raw columns → validate
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Month labels, numeric Series
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
