//! HTTP polling data source.
//!
//! A background task fetches the stats endpoint, hands each successful
//! snapshot to the UI through a watch channel, and waits `interval` after the
//! cycle completes before starting the next one (fixed delay). A slow
//! endpoint therefore stretches the cycle instead of stacking requests, and
//! snapshots always arrive in request order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{DataSource, Endpoint, PollError, PolledSnapshot, StatsSnapshot};

/// Something that can fetch one stats snapshot.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self) -> Result<StatsSnapshot, PollError>;
}

/// Fetches snapshots from an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: Endpoint,
}

impl HttpFetcher {
    /// Create a fetcher. No request timeout is applied unless one is given.
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self, PollError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self) -> Result<StatsSnapshot, PollError> {
        let mut request = self
            .client
            .get(self.endpoint.url())
            .header(ACCEPT, "application/json");
        if let Some(auth) = self.endpoint.authorization() {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(PollError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let stats: StatsSnapshot = serde_json::from_slice(&body)?;

        Ok(stats)
    }
}

/// Drives a [`Fetch`] on a fixed delay, numbering each cycle.
#[derive(Debug)]
pub struct Poller<F> {
    fetcher: F,
    interval: Duration,
    next_request_id: u64,
}

impl<F: Fetch> Poller<F> {
    pub fn new(fetcher: F, interval: Duration) -> Self {
        Self {
            fetcher,
            interval,
            next_request_id: 0,
        }
    }

    /// Run a single cycle and return its id and outcome.
    pub async fn cycle(&mut self) -> (u64, Result<StatsSnapshot, PollError>) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        debug!(request_id, "at=request");
        let result = self.fetcher.fetch().await;
        match &result {
            Ok(stats) => debug!(request_id, metrics = stats.len(), "at=response"),
            Err(e) => warn!(request_id, error = %e, "stats poll failed"),
        }
        debug!(request_id, "at=complete");

        (request_id, result)
    }

    /// Poll until the receiving side goes away.
    ///
    /// Failures are recorded in `last_error` and never end the loop.
    pub async fn run(
        mut self,
        sender: watch::Sender<Option<PolledSnapshot>>,
        last_error: Arc<Mutex<Option<String>>>,
    ) {
        loop {
            let (request_id, result) = self.cycle().await;

            match result {
                Ok(stats) => {
                    set_error(&last_error, None);
                    let polled = PolledSnapshot { request_id, stats };
                    if sender.send(Some(polled)).is_err() {
                        info!("UI receiver dropped, stopping poller");
                        break;
                    }
                }
                Err(e) => {
                    set_error(&last_error, Some(e.to_string()));
                    if sender.is_closed() {
                        break;
                    }
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

fn set_error(slot: &Mutex<Option<String>>, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

/// A data source backed by a background [`Poller`].
///
/// Must be created from within a tokio runtime. Dropping the source stops
/// the poll task.
#[derive(Debug)]
pub struct HttpSource {
    receiver: watch::Receiver<Option<PolledSnapshot>>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl HttpSource {
    /// Start polling `endpoint` every `interval` (measured from the end of
    /// the previous cycle).
    pub fn connect(
        endpoint: Endpoint,
        interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<Self, PollError> {
        let description = format!("http: {}", endpoint);
        let fetcher = HttpFetcher::new(endpoint, timeout)?;
        Ok(Self::spawn(fetcher, interval, &description))
    }

    /// Start polling with any fetcher.
    pub fn spawn<F>(fetcher: F, interval: Duration, description: &str) -> Self
    where
        F: Fetch + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let last_error = Arc::new(Mutex::new(None));

        let poller = Poller::new(fetcher, interval);
        let task = tokio::spawn(poller.run(tx, last_error.clone()));

        Self {
            receiver: rx,
            description: description.to_string(),
            last_error,
            task,
        }
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<PolledSnapshot> {
        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
