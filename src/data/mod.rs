/// Data layer: launch records, loading, aggregation and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, sites, payload bounds
///   └───────────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │ summary   │ pie counts  │  filter   │ payload/site → row indices
///   └──────────┘             └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
