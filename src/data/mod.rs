/// Data layer: core types, loading, labelling and grouping.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  label    │  Solidity <= threshold → Target column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  group rows by label value
///   └──────────┘
/// ```

pub mod filter;
pub mod label;
pub mod loader;
pub mod model;
