// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! Process-wide structured logging.

use crate::admission::{AdmissionError, AdmissionResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init() -> AdmissionResult<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            AdmissionError::config(format!("failed to install log subscriber: {}", e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_fails() {
        // Another test may already have installed one.
        let _ = init();
        assert!(matches!(init(), Err(AdmissionError::Config(_))));
    }
}
