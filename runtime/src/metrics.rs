//! Prometheus metrics for the booking engine.
//!
//! Covers:
//! - Booking requests by outcome, and booking length in nights
//! - Review requests by outcome
//! - Store failures by operation
//! - Time spent waiting for a per-space lock
//!
//! # Example
//!
//! ```rust,no_run
//! use spacebook_runtime::metrics::MetricsServer;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Scrape output
//! if let Some(body) = server.render() {
//!     println!("{body}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics server.
///
/// Installs the global recorder and exposes it on an HTTP endpoint for
/// Prometheus scraping.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address to bind to (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Install the Prometheus recorder and start serving `/metrics`.
    ///
    /// Must be called from within a Tokio runtime; the HTTP listener runs as
    /// a spawned task for the life of the runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built (including when the
    /// address cannot be bound) or if a global recorder is already installed.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        let (recorder, exporter) = builder()?
            .with_http_listener(self.addr)
            .build()
            .map_err(|e| MetricsError::Build(e.to_string()))?;
        let handle = recorder.handle();

        metrics::set_global_recorder(recorder).map_err(|e| MetricsError::Install(e.to_string()))?;
        register_metrics();

        let addr = self.addr;
        tokio::spawn(async move {
            if let Err(_e) = exporter.await {
                // `ExporterError` implements neither Debug nor Display in 0.15.
                tracing::error!(%addr, "Metrics HTTP listener stopped");
            }
        });

        self.handle = Some(handle);
        tracing::info!(
            addr = %self.addr,
            "Metrics server started - available at http://{}/metrics",
            self.addr
        );
        Ok(())
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if server hasn't been started.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Exporter builder with the engine's histogram buckets.
fn builder() -> Result<PrometheusBuilder, MetricsError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[
                0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
        )
        .and_then(|b| {
            b.set_buckets_for_metric(
                Matcher::Full("spacebook_booking_nights".to_string()),
                &[1.0, 2.0, 3.0, 5.0, 7.0, 14.0, 30.0, 90.0],
            )
        })
        .map_err(|e| MetricsError::Build(e.to_string()))
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "spacebook_bookings_total",
        "Booking requests by outcome (created, conflict, rejected, error)"
    );
    describe_histogram!(
        "spacebook_booking_nights",
        "Length in nights of successfully created bookings"
    );
    describe_counter!(
        "spacebook_reviews_total",
        "Review requests by outcome (created, duplicate, rejected, error)"
    );
    describe_counter!(
        "spacebook_store_errors_total",
        "Storage failures by operation"
    );
    describe_histogram!(
        "spacebook_lock_wait_duration_seconds",
        "Time spent waiting for a per-space lock"
    );
}

/// Result of a write request, as reported in metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Persisted
    Created,
    /// Rejected because it collides with existing state
    Conflict,
    /// Rejected before touching existing state (not found, forbidden, invalid)
    Rejected,
    /// The store failed
    Error,
}

impl Outcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Conflict => "conflict",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

/// Booking metrics recorder.
pub struct BookingMetrics;

impl BookingMetrics {
    /// Record the outcome of a booking request.
    pub fn record_outcome(outcome: Outcome) {
        counter!("spacebook_bookings_total", "outcome" => outcome.as_str()).increment(1);
    }

    /// Record the length of a created booking.
    #[allow(clippy::cast_precision_loss)] // night counts are small
    pub fn record_nights(nights: i64) {
        histogram!("spacebook_booking_nights").record(nights as f64);
    }

    /// Record how long a request waited for its space lock.
    pub fn record_lock_wait(duration: Duration) {
        histogram!("spacebook_lock_wait_duration_seconds").record(duration.as_secs_f64());
    }
}

/// Review metrics recorder.
pub struct ReviewMetrics;

impl ReviewMetrics {
    /// Record the outcome of a review request.
    ///
    /// `Conflict` is reported as `duplicate`.
    pub fn record_outcome(outcome: Outcome) {
        let label = match outcome {
            Outcome::Conflict => "duplicate",
            other => other.as_str(),
        };
        counter!("spacebook_reviews_total", "outcome" => label).increment(1);
    }
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a failed store call.
    pub fn record_error(operation: &'static str) {
        counter!("spacebook_store_errors_total", "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_metrics_server_creation() {
        let addr = "127.0.0.1:0".parse().unwrap();
        let server = MetricsServer::new(addr);
        assert!(server.handle().is_none());
        assert!(server.render().is_none());
    }

    #[test]
    fn test_recorded_metrics_render() {
        let recorder = builder().unwrap().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            BookingMetrics::record_outcome(Outcome::Created);
            BookingMetrics::record_nights(5);
            ReviewMetrics::record_outcome(Outcome::Conflict);
            StoreMetrics::record_error("insert_booking");
        });

        let rendered = handle.render();
        assert!(rendered.contains("spacebook_bookings_total{outcome=\"created\"} 1"));
        assert!(rendered.contains("spacebook_reviews_total{outcome=\"duplicate\"} 1"));
        assert!(rendered.contains("spacebook_store_errors_total{operation=\"insert_booking\"} 1"));
        assert!(rendered.contains("spacebook_booking_nights_bucket"));
        assert!(rendered.contains("spacebook_booking_nights_count 1"));
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Created.as_str(), "created");
        assert_eq!(Outcome::Conflict.as_str(), "conflict");
        assert_eq!(Outcome::Rejected.as_str(), "rejected");
        assert_eq!(Outcome::Error.as_str(), "error");
    }
}
