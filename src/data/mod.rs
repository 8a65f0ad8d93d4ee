/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///   four CSV resources (HTTP or directory)
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  TextSource::get → raw text + status
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split rows → typed records, fallback to defaults
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  four ordered slices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterState → DatasetView (Cow slices)
///   └──────────┘
///        │
///        ├──► charts / panels
///        └──► export (Category,Year,Value,Confidence,Sources)
/// ```

pub mod defaults;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
pub mod summary;
