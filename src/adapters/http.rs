//! HTTP telemetry uplink.
//!
//! Implements [`TelemetryTransport`] by POSTing each snapshot as JSON with a
//! blocking `reqwest` client. Transient failures (connect errors, timeouts
//! and the gateway/throttling statuses in [`RetryPolicy::retry_statuses`])
//! are retried with exponential backoff before the send is reported failed.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::app::ports::TelemetryTransport;
use crate::config::StationConfig;
use crate::error::TransportError;
use crate::sensors::TelemetrySnapshot;

/// Retry policy for snapshot delivery.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    pub initial_delay: Duration,
    /// Response statuses worth another attempt.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            retry_statuses: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `retry` (1-based): 1 s, 2 s, 4 s, ...
    pub fn delay_for(&self, retry: u32) -> Duration {
        let multiplier = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay.saturating_mul(multiplier)
    }

    pub fn is_retryable(&self, error: TransportError) -> bool {
        match error {
            TransportError::Connection => true,
            TransportError::Status(code) => self.retry_statuses.contains(&code),
            TransportError::Encode | TransportError::ClientSetup => false,
        }
    }
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
    policy: RetryPolicy,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, policy: RetryPolicy) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            warn!("HTTP client setup failed: {}", e);
            TransportError::ClientSetup
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            policy,
        })
    }

    pub fn from_config(config: &StationConfig) -> Result<Self, TransportError> {
        Self::new(
            config.endpoint_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
            RetryPolicy::default(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post_once(&self, body: &[u8]) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .map_err(|e| {
                debug!("POST {} failed: {}", self.endpoint, e);
                TransportError::Connection
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(status.as_u16()))
        }
    }
}

impl TelemetryTransport for HttpTransport {
    fn send(&mut self, snapshot: &TelemetrySnapshot) -> Result<(), TransportError> {
        let body = serde_json::to_vec(snapshot).map_err(|_| TransportError::Encode)?;

        let mut retry = 0;
        loop {
            match self.post_once(&body) {
                Ok(()) => return Ok(()),
                Err(e) if retry < self.policy.max_retries && self.policy.is_retryable(e) => {
                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    warn!(
                        "Telemetry POST failed ({}); retry {}/{} in {:?}",
                        e, retry, self.policy.max_retries, delay
                    );
                    thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
