//! In-memory upstream shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use clickmap::error::{Error, Result};
use clickmap::metrics::{MetricsPipeline, MetricsWindow};
use clickmap::upstream::{Endpoints, Gateway};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "https://api.test/v4";
pub const TOKEN: &str = "test-token";

#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Malformed,
}

/// A request as seen by the fake gateway
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub token: String,
    pub query: Vec<(String, String)>,
}

/// Serves canned replies keyed by URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeGateway {
    replies: HashMap<String, (Duration, Reply)>,
    events: Mutex<Vec<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: String, reply: Reply) -> Self {
        self.replies.insert(url, (Duration::ZERO, reply));
        self
    }

    pub fn reply_after(mut self, url: String, delay: Duration, reply: Reply) -> Self {
        self.replies.insert(url, (delay, reply));
        self
    }

    /// `start:<url>` / `done:<url>` in the order they happened
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn fetch_json(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.events.lock().unwrap().push(format!("start:{url}"));
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            token: token.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let (delay, reply) = self
            .replies
            .get(url)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Status(404)));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.events.lock().unwrap().push(format!("done:{url}"));
        match reply {
            Reply::Json(value) => Ok(value),
            Reply::Status(status) => Err(Error::UpstreamHttp {
                status,
                url: url.to_string(),
            }),
            Reply::Malformed => Err(Error::MalformedResponse {
                url: url.to_string(),
                reason: "expected value at line 1 column 1".to_string(),
            }),
        }
    }
}

pub fn endpoints() -> Endpoints {
    Endpoints::new(BASE_URL)
}

pub fn user_url() -> String {
    endpoints().user()
}

pub fn bitlinks_url(group_guid: &str) -> String {
    endpoints().group_bitlinks(group_guid)
}

/// Countries URL for an already-encoded bitlink such as `bit.ly%2Fx`
pub fn countries_url(encoded: &str) -> String {
    format!("{BASE_URL}/bitlinks/{encoded}/countries")
}

pub fn group_reply(guid: &str) -> Reply {
    Reply::Json(json!({ "login": "tester", "default_group_guid": guid }))
}

pub fn links_reply(links: &[&str]) -> Reply {
    let links: Vec<Value> = links.iter().map(|link| json!({ "link": link })).collect();
    Reply::Json(json!({ "links": links, "pagination": { "total": links.len() } }))
}

pub fn metrics_reply(countries: &[(&str, u64)]) -> Reply {
    let metrics: Vec<Value> = countries
        .iter()
        .map(|(country, clicks)| json!({ "value": country, "clicks": clicks }))
        .collect();
    Reply::Json(json!({ "unit": "day", "units": 30, "facet": "countries", "metrics": metrics }))
}

/// Group `g1` with bitlinks x → {US: 60} and y → {FR: 30}
pub fn two_link_gateway() -> FakeGateway {
    FakeGateway::new()
        .reply(user_url(), group_reply("g1"))
        .reply(
            bitlinks_url("g1"),
            links_reply(&["https://bit.ly/x", "https://bit.ly/y"]),
        )
        .reply(countries_url("bit.ly%2Fx"), metrics_reply(&[("US", 60)]))
        .reply(countries_url("bit.ly%2Fy"), metrics_reply(&[("FR", 30)]))
}

pub fn pipeline(gateway: Arc<FakeGateway>) -> MetricsPipeline {
    MetricsPipeline::new(gateway, endpoints(), MetricsWindow::default())
}
