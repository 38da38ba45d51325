//! Per-country click metrics for a caller's default group
//!
//! The pipeline resolves token → group → bitlinks, fans out one metrics
//! request per bitlink and folds the answers into daily averages.

pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod validate;

pub use models::{CountryAverages, CountryMetric, MetricsResult, MetricsWindow, NormalizedBitlink};
pub use pipeline::MetricsPipeline;
