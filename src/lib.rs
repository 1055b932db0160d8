//! CloudFlare Access gateway for Home Assistant cloud bridges.
//!
//! Sits between a voice-assistant cloud service and a self-hosted Home
//! Assistant instance, injecting CloudFlare Access service-token
//! credentials and enforcing a security perimeter: sliding-window rate
//! limiting, payload bounds, single-origin allow-listing, and secret
//! redaction.

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use config::{ConfigCache, DirStore, GatewayConfiguration, SecretStore};
pub use error::{ConfigError, GatewayError};
pub use http::Gateway;
