/// Data layer: core types, loading, and segment filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  ordered named columns of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  selected values per column → segment row indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

pub use model::{CellValue, Column, Dataset};
