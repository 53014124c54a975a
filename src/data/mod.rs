/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  cleaned_providers.csv / cleaned_receivers.csv
///  cleaned_food_listings.csv / cleaned_claims.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  four tables, filter option index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply selection → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics, group counts, display order
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
