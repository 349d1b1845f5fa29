/// Data layer: order records, loading, and date filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OrderDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ OrderDataset  │  Vec<OrderRecord> sorted by delivery, min/max date
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  delivery date ∈ [start, end] → borrowed subset
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod timestamp;
