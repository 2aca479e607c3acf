//! Historical graphs from a Graphite-compatible render API.
//!
//! The render URL is the one a browser would embed as an image. The terminal
//! cannot show images, so it asks the same endpoint for `format=json` and
//! draws the datapoints itself.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Default lookback window in seconds.
pub const DEFAULT_PERIOD_SECS: u64 = 3600;

/// Errors fetching a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Graph service returned status {0}")]
    Status(u16),

    #[error("Failed to parse graph data: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Http(err.to_string())
    }
}

/// Builds render URLs and fetches graph data.
#[derive(Debug, Clone)]
pub struct GraphiteClient {
    client: Client,
    base_url: String,
    period_secs: u64,
}

impl GraphiteClient {
    pub fn new(base_url: impl Into<String>, period_secs: u64) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            period_secs,
        }
    }

    pub fn period_secs(&self) -> u64 {
        self.period_secs
    }

    /// Image URL for a metric's history.
    pub fn render_url(&self, metric: &str) -> String {
        format!(
            "{}/render/?width=800&height=400&margin=30&areaMode=all&fontSize=14&from=-{}seconds&target=pulse.{}",
            self.base_url, self.period_secs, metric
        )
    }

    /// Same query as [`render_url`](Self::render_url), as JSON datapoints.
    pub fn data_url(&self, metric: &str) -> String {
        format!("{}&format=json", self.render_url(metric))
    }

    pub async fn fetch(&self, metric: &str) -> Result<GraphSeries, GraphError> {
        let response = self.client.get(self.data_url(metric)).send().await?;

        if !response.status().is_success() {
            return Err(GraphError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        GraphSeries::parse(metric, &body)
    }
}

/// One metric's history as `(timestamp, value)` points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSeries {
    pub target: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    target: String,
    datapoints: Vec<(Option<f64>, f64)>,
}

impl GraphSeries {
    /// Parse a Graphite JSON render response.
    ///
    /// Null datapoints are gaps and are dropped. An empty response yields an
    /// empty series rather than an error.
    pub fn parse(metric: &str, body: &[u8]) -> Result<Self, GraphError> {
        let raw: Vec<RawSeries> =
            serde_json::from_slice(body).map_err(|e| GraphError::Parse(e.to_string()))?;

        let Some(first) = raw.into_iter().next() else {
            return Ok(Self {
                target: format!("pulse.{}", metric),
                points: Vec::new(),
            });
        };

        let points = first
            .datapoints
            .into_iter()
            .filter_map(|(value, ts)| value.map(|v| (ts, v)))
            .collect();

        Ok(Self {
            target: first.target,
            points,
        })
    }

    /// `(min, max)` of the values, if there are any.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|&(_, v)| v).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// `(first, last)` timestamps.
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }
}

/// A finished background fetch.
#[derive(Debug)]
pub struct GraphResult {
    pub metric: String,
    pub result: Result<GraphSeries, GraphError>,
}

/// Runs graph fetches on a tokio runtime and collects the results.
#[derive(Debug)]
pub struct GraphFetcher {
    client: Arc<GraphiteClient>,
    handle: Handle,
    sender: mpsc::UnboundedSender<GraphResult>,
    receiver: mpsc::UnboundedReceiver<GraphResult>,
}

impl GraphFetcher {
    pub fn new(client: GraphiteClient, handle: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            handle,
            sender,
            receiver,
        }
    }

    pub fn client(&self) -> &GraphiteClient {
        &self.client
    }

    /// Start fetching a metric's graph in the background.
    pub fn request(&self, metric: &str) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        let metric = metric.to_string();

        info!(url = %client.render_url(&metric), "opening hover graph");

        self.handle.spawn(async move {
            let result = client.fetch(&metric).await;
            if let Err(e) = &result {
                warn!(metric = %metric, error = %e, "graph fetch failed");
            }
            let _ = sender.send(GraphResult { metric, result });
        });
    }

    /// Take a finished fetch, if any.
    pub fn try_recv(&mut self) -> Option<GraphResult> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_url() {
        let client = GraphiteClient::new("https://graphite.example.com/", DEFAULT_PERIOD_SECS);
        assert_eq!(
            client.render_url("cpu"),
            "https://graphite.example.com/render/?width=800&height=400&margin=30\
             &areaMode=all&fontSize=14&from=-3600seconds&target=pulse.cpu"
        );
    }

    #[test]
    fn test_data_url_period() {
        let client = GraphiteClient::new("http://g", 600);
        let url = client.data_url("mem");
        assert!(url.contains("from=-600seconds"));
        assert!(url.contains("target=pulse.mem"));
        assert!(url.ends_with("&format=json"));
    }

    #[test]
    fn test_parse_series() {
        let body = br#"[{"target": "pulse.cpu", "datapoints": [[1.5, 100], [null, 110], [3.0, 120]]}]"#;
        let series = GraphSeries::parse("cpu", body).unwrap();

        assert_eq!(series.target, "pulse.cpu");
        assert_eq!(series.points, vec![(100.0, 1.5), (120.0, 3.0)]);
        assert_eq!(series.value_bounds(), Some((1.5, 3.0)));
        assert_eq!(series.time_bounds(), Some((100.0, 120.0)));
    }

    #[test]
    fn test_parse_empty_response() {
        let series = GraphSeries::parse("cpu", b"[]").unwrap();
        assert_eq!(series.target, "pulse.cpu");
        assert!(series.points.is_empty());
        assert!(series.value_bounds().is_none());
    }

    #[test]
    fn test_parse_garbage() {
        let err = GraphSeries::parse("cpu", b"<html>").unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_delivered() {
        // Nothing listens on port 9 on loopback
        let client = GraphiteClient::new("http://127.0.0.1:9", 60);
        let mut fetcher = GraphFetcher::new(client, Handle::current());

        fetcher.request("cpu");

        let mut delivered = None;
        for _ in 0..100 {
            if let Some(r) = fetcher.try_recv() {
                delivered = Some(r);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        let delivered = delivered.expect("fetch result delivered");
        assert_eq!(delivered.metric, "cpu");
        assert!(delivered.result.is_err());
    }
}
