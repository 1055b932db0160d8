//! Structured logging initialization.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured events
//! - Level configurable through `RUST_LOG`, sensible default otherwise
//! - Security events log the denial kind and source IP, never secrets

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ha_gateway=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
