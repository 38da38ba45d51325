//! Structural checks for the three upstream response shapes
//!
//! Each validator stops at the first violation, logs the offending fragment
//! and returns the matching typed error.

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::metrics::CountryMetric;

/// Extract `default_group_guid` from a user payload.
pub fn validate_group_response(response: &Value) -> Result<String> {
    match response.get("default_group_guid") {
        Some(Value::String(guid)) => Ok(guid.clone()),
        Some(_) => {
            warn!(payload = %response, "default_group_guid has invalid type");
            Err(Error::InvalidGroupData(format!(
                "\"default_group_guid\" is not a string: {response}"
            )))
        }
        None => {
            warn!(payload = %response, "default_group_guid missing from upstream data");
            Err(Error::InvalidGroupData(format!(
                "\"default_group_guid\" missing: {response}"
            )))
        }
    }
}

/// Extract the raw `link` of every element of `links`.
pub fn validate_bitlinks_response(response: &Value) -> Result<Vec<String>> {
    let links = match response.get("links") {
        Some(Value::Array(links)) => links,
        Some(_) => {
            warn!(payload = %response, "links field has invalid type");
            return Err(Error::InvalidLinkData(format!(
                "\"links\" is not an array: {response}"
            )));
        }
        None => {
            warn!(payload = %response, "links field missing from upstream data");
            return Err(Error::InvalidLinkData(format!("\"links\" missing: {response}")));
        }
    };

    links
        .iter()
        .map(|link_obj| match link_obj.get("link") {
            Some(Value::String(link)) => Ok(link.clone()),
            Some(_) => {
                warn!(payload = %link_obj, "link field has invalid type");
                Err(Error::InvalidLinkData(format!(
                    "\"link\" is not a string: {link_obj}"
                )))
            }
            None => {
                warn!(payload = %link_obj, "link field missing from bitlink data");
                Err(Error::InvalidLinkData(format!("\"link\" missing: {link_obj}")))
            }
        })
        .collect()
}

/// Extract `(value, clicks)` pairs from a country metrics payload.
pub fn validate_metrics_response(response: &Value) -> Result<Vec<CountryMetric>> {
    let metrics = match response.get("metrics") {
        Some(Value::Array(metrics)) => metrics,
        Some(_) => {
            warn!(payload = %response, "metrics field has invalid type");
            return Err(Error::InvalidMetricsData(format!(
                "\"metrics\" is not an array: {response}"
            )));
        }
        None => {
            warn!(payload = %response, "metrics field missing from upstream data");
            return Err(Error::InvalidMetricsData(format!(
                "\"metrics\" missing: {response}"
            )));
        }
    };

    metrics.iter().map(country_metric).collect()
}

fn country_metric(country_obj: &Value) -> Result<CountryMetric> {
    let country = match country_obj.get("value") {
        Some(Value::String(country)) => country.clone(),
        Some(_) => {
            warn!(payload = %country_obj, "value field has invalid type");
            return Err(Error::InvalidMetricsData(format!(
                "\"value\" is not a string: {country_obj}"
            )));
        }
        None => {
            warn!(payload = %country_obj, "value field missing from metrics data");
            return Err(Error::InvalidMetricsData(format!(
                "\"value\" missing: {country_obj}"
            )));
        }
    };

    let clicks = match country_obj.get("clicks") {
        Some(Value::Number(clicks)) => match clicks.as_f64() {
            Some(clicks) => clicks,
            None => {
                warn!(payload = %country_obj, "clicks field out of range");
                return Err(Error::InvalidMetricsData(format!(
                    "\"clicks\" out of range: {country_obj}"
                )));
            }
        },
        Some(_) => {
            warn!(payload = %country_obj, "clicks field has invalid type");
            return Err(Error::InvalidMetricsData(format!(
                "\"clicks\" is not a number: {country_obj}"
            )));
        }
        None => {
            warn!(payload = %country_obj, "clicks field missing from metrics data");
            return Err(Error::InvalidMetricsData(format!(
                "\"clicks\" missing: {country_obj}"
            )));
        }
    };

    Ok(CountryMetric { country, clicks })
}
