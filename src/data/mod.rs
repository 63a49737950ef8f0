/// Data layer: core types, loading, schema, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .psv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → header + rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  header → ColumnDescriptor list
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSet → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered rows → CSV / JSON
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
