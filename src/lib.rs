//! Housing price time-series analytics.
//!
//! Two wide-format snapshot tables (one row per region, one column per
//! month) go in; an aligned per-region series and year-over-year rankings
//! come out. The analytical core never fails: bad rows and cells are skipped
//! and recorded in a [`types::Diagnostics`] returned next to each result.
pub mod affordability;
pub mod align;
pub mod cache;
pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod reports;
pub mod trend;
pub mod types;
pub mod util;
pub mod window;
