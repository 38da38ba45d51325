//! Data models for click metrics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use crate::config::MetricsConfig;
use crate::error::Result;
use crate::metrics::normalize;

/// Canonical `domain/hash` of a bitlink, percent-encoded for use as a path
/// segment. This is the key a bitlink is reported under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedBitlink(String);

impl NormalizedBitlink {
    /// Strip the scheme from a raw link URL and encode the remainder.
    pub fn parse(link: &str) -> Result<Self> {
        let domain_hash = normalize::strip_scheme(link)?;
        Ok(Self(normalize::encode_segment(domain_hash)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedBitlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a bitlink's country breakdown, as returned upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryMetric {
    /// Country name with upstream casing preserved
    pub country: String,

    /// Raw clicks over the requested window
    pub clicks: f64,
}

/// Country name → average daily clicks
pub type CountryAverages = BTreeMap<String, f64>;

/// Bitlink → its country averages. A bitlink whose metrics could not be
/// fetched maps to an empty breakdown.
pub type MetricsResult = BTreeMap<NormalizedBitlink, CountryAverages>;

/// Trailing window the per-bitlink metrics are requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsWindow {
    days: NonZeroU32,
}

impl MetricsWindow {
    pub fn days(days: NonZeroU32) -> Self {
        Self { days }
    }

    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::days(config.window_days)
    }

    pub fn len_days(&self) -> u32 {
        self.days.get()
    }

    pub fn average(&self, clicks: f64) -> f64 {
        clicks / f64::from(self.days.get())
    }
}

impl Default for MetricsWindow {
    fn default() -> Self {
        Self::days(MetricsConfig::DEFAULT_WINDOW_DAYS)
    }
}
