/// Data layer: table model, file readers and the statistics behind the charts.
///
/// Architecture:
/// ```text
///  .csv / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file, infer dtypes → DataFrame
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ DataFrame │  named columns, select_numeric, drop_nulls
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  quartiles, KDE, correlation, histograms
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
