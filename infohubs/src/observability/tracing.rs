//! Structured logging for hub resolutions.
//!
//! Every resolution is logged at debug level with the hub pair id, the
//! requested key, the strategy or factory that produced it and its duration.

use crate::core::StrategyKind;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `filter` (e.g. `"infohubs=debug"`).
///
/// `RUST_LOG` takes precedence when set. With `json` the output is one JSON
/// object per event. Calling this more than once is a no-op, and an already
/// installed global subscriber is left alone.
pub fn init_tracing(filter: &str, json: bool) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true);

        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

/// Attributes of a single resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionSpan {
    /// Id of the hub pair (the request id of its context).
    pub hub_id: String,
    /// The requested key.
    pub key: String,
    /// How the key was resolved.
    pub strategy: Option<StrategyKind>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
    /// Error message if resolution failed.
    pub error: Option<String>,
}

impl ResolutionSpan {
    /// Creates attributes for `key` on the hub pair `hub_id`.
    #[must_use]
    pub fn new(hub_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            hub_id: hub_id.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    /// Sets the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Sets the error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Logs the outcome of a resolution and returns its attributes.
    pub fn finish(self, span: ResolutionSpan, error: Option<String>) -> ResolutionSpan {
        let span = span.with_duration_ms(self.elapsed_ms());
        match error {
            None => {
                tracing::debug!(
                    hub_id = %span.hub_id,
                    key = %span.key,
                    strategy = ?span.strategy,
                    duration_ms = span.duration_ms,
                    "{} resolved",
                    self.name
                );
                span
            }
            Some(message) => {
                tracing::debug!(
                    hub_id = %span.hub_id,
                    key = %span.key,
                    strategy = ?span.strategy,
                    error = %message,
                    "{} failed",
                    self.name
                );
                span.with_error(message)
            }
        }
    }
}
