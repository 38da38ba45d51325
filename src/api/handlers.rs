use axum::{
    extract::{OriginalUri, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::envelope::ApiError;
use crate::auth::BearerToken;
use crate::metrics::{MetricsPipeline, MetricsResult};

pub struct AppState {
    pub pipeline: Arc<MetricsPipeline>,
    pub api_version: String,
}

/// Query pairs of a get-clicks request; a repeated `country` resolves to its
/// last occurrence.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ClicksQuery(Vec<(String, String)>);

impl ClicksQuery {
    /// Case-insensitive country to restrict the breakdown to. Blank values
    /// are treated as absent; anything else is matched as sent.
    fn country_filter(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == "country")
            .map(|(_, country)| country.as_str())
            .filter(|country| !country.trim().is_empty())
    }
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub apiversion: String,
    pub uri: String,
}

#[derive(Serialize)]
pub struct ClicksResponse {
    pub apiversion: String,
    pub uri: String,
    pub metrics: MetricsResult,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// API version banner
pub async fn root(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Json<VersionResponse> {
    Json(VersionResponse {
        apiversion: state.api_version.clone(),
        uri: uri.to_string(),
    })
}

/// Average daily clicks per country for every bitlink in the caller's
/// default group
pub async fn get_clicks(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Extension(token): Extension<BearerToken>,
    Query(query): Query<ClicksQuery>,
) -> Result<Json<ClicksResponse>, ApiError> {
    let uri = uri.to_string();

    match state
        .pipeline
        .get_metrics(token.as_str(), query.country_filter())
        .await
    {
        Ok(metrics) => Ok(Json(ClicksResponse {
            apiversion: state.api_version.clone(),
            uri,
            metrics,
        })),
        Err(e) => Err(ApiError::from_pipeline(&e, uri)),
    }
}

/// Unknown routes and methods
pub async fn unimplemented(OriginalUri(uri): OriginalUri) -> ApiError {
    tracing::debug!(uri = %uri, "unimplemented route or method");
    ApiError::unimplemented(uri.to_string())
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
