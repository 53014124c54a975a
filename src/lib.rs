//! Local food wastage dashboard.
//!
//! Loads the provider, receiver, food listing and claim tables, filters
//! them by city, meal type, food type and claim status, and derives the
//! headline metrics and grouped counts shown on the dashboard.

pub mod dashboard;
pub mod data;
pub mod report;
pub mod state;

pub use dashboard::{build_view, DashboardView};
pub use data::filter::FilterSelection;
pub use data::loader::{load_dataset, LoadError};
pub use data::model::{Dataset, Dimension, ListingColumn};
pub use state::Session;
