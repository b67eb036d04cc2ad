//! Dashboard metrics aggregation.
//!
//! Pure functions turn a [`Snapshot`](crate::model::Snapshot) into per-plant
//! metrics, a three-tier status, a weekly incident histogram and a
//! system-wide summary. [`analyzer`] wires them to a data source and the
//! JSON/CSV/S3 outputs.

pub mod analyzer;
pub mod audit;
pub mod overview;
pub mod plant;
pub mod status;
pub mod types;
pub mod utility;
pub mod weekly;
pub mod writetos3;

pub use audit::audit_snapshot;
pub use overview::{metrics_for_plant, summarize};
pub use plant::compute_metrics;
pub use status::classify_status;
pub use weekly::bucket_last_week;
