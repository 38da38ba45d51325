//! Token → group → bitlinks → per-country daily averages
//!
//! Group and link resolution are request-fatal: without them there is no
//! meaningful partial answer. Once the bitlink set is known, each metrics
//! fetch is isolated and a failure leaves that bitlink with an empty
//! breakdown instead of failing the request.

use futures::future::join_all;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::validate::{
    validate_bitlinks_response, validate_group_response, validate_metrics_response,
};
use crate::metrics::{CountryAverages, CountryMetric, MetricsResult, MetricsWindow, NormalizedBitlink};
use crate::upstream::{Endpoints, Gateway};

pub struct MetricsPipeline {
    gateway: Arc<dyn Gateway>,
    endpoints: Endpoints,
    window: MetricsWindow,
}

impl MetricsPipeline {
    pub fn new(gateway: Arc<dyn Gateway>, endpoints: Endpoints, window: MetricsWindow) -> Self {
        Self {
            gateway,
            endpoints,
            window,
        }
    }

    pub fn from_config(gateway: Arc<dyn Gateway>, config: &Config) -> Self {
        Self::new(
            gateway,
            Endpoints::from_config(&config.upstream),
            MetricsWindow::from_config(&config.metrics),
        )
    }

    /// Average daily clicks per country for every bitlink in the caller's
    /// default group, optionally restricted to one country (case-insensitive).
    pub async fn get_metrics(&self, token: &str, country_filter: Option<&str>) -> Result<MetricsResult> {
        let group_guid = self.resolve_group(token).await?;
        let bitlinks = self.resolve_bitlinks(token, &group_guid).await?;

        debug!(
            group_guid = %group_guid,
            count = bitlinks.len(),
            "fetching country metrics"
        );

        // All requests are created up front and polled together; join_all
        // yields results in input order regardless of completion order.
        let fetches = bitlinks
            .iter()
            .map(|bitlink| self.fetch_country_metrics(token, bitlink));
        let responses = join_all(fetches).await;

        let mut result = MetricsResult::new();
        let mut failed = 0usize;
        for (bitlink, response) in bitlinks.into_iter().zip(responses) {
            let averages = match response {
                Ok(metrics) => daily_averages(&metrics, self.window, country_filter),
                Err(e) => {
                    failed += 1;
                    warn!(bitlink = %bitlink, error = %e, "metrics unavailable for bitlink");
                    CountryAverages::new()
                }
            };
            result.insert(bitlink, averages);
        }

        info!(
            bitlinks = result.len(),
            failed,
            filtered = country_filter.is_some(),
            "aggregated country metrics"
        );

        Ok(result)
    }

    async fn resolve_group(&self, token: &str) -> Result<String> {
        let response = self
            .fetch_tolerant(&self.endpoints.user(), token, &[])
            .await?;
        validate_group_response(&response)
    }

    /// Links that normalize to the same key are fetched once, first one wins.
    async fn resolve_bitlinks(&self, token: &str, group_guid: &str) -> Result<Vec<NormalizedBitlink>> {
        let response = self
            .fetch_tolerant(&self.endpoints.group_bitlinks(group_guid), token, &[])
            .await?;

        let mut seen = BTreeSet::new();
        let mut bitlinks = Vec::new();
        for link in validate_bitlinks_response(&response)? {
            let bitlink = NormalizedBitlink::parse(&link)?;
            if seen.insert(bitlink.clone()) {
                bitlinks.push(bitlink);
            } else {
                debug!(link = %link, bitlink = %bitlink, "skipping duplicate bitlink");
            }
        }
        Ok(bitlinks)
    }

    async fn fetch_country_metrics(
        &self,
        token: &str,
        bitlink: &NormalizedBitlink,
    ) -> Result<Vec<CountryMetric>> {
        let units = self.window.len_days().to_string();
        let query = [("unit", "day"), ("units", units.as_str())];

        let response = self
            .fetch_tolerant(&self.endpoints.bitlink_countries(bitlink), token, &query)
            .await?;
        validate_metrics_response(&response)
    }

    /// Unparseable bodies become `{}` so the validators decide whether the
    /// request can go on.
    async fn fetch_tolerant(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value> {
        match self.gateway.fetch_json(url, token, query).await {
            Err(e @ Error::MalformedResponse { .. }) => {
                warn!(error = %e, "could not parse upstream response, expected JSON");
                Ok(Value::Object(Default::default()))
            }
            other => other,
        }
    }
}

/// Sum clicks per country, keep only the filtered country if one is given,
/// and divide by the window length.
pub fn daily_averages(
    metrics: &[CountryMetric],
    window: MetricsWindow,
    country_filter: Option<&str>,
) -> CountryAverages {
    let filter = country_filter.map(str::to_lowercase);

    let mut totals = CountryAverages::new();
    for metric in metrics {
        if let Some(filter) = &filter {
            if metric.country.to_lowercase() != *filter {
                continue;
            }
        }
        *totals.entry(metric.country.clone()).or_insert(0.0) += metric.clicks;
    }

    for clicks in totals.values_mut() {
        *clicks = window.average(*clicks);
    }
    totals
}
