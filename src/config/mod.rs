//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! secret store path (e.g. /app/config/)
//!     → store.rs (fetch parameters, JSON-decode values)
//!     → schema.rs (typed GatewayConfiguration, fail-fast validation)
//!     → cache.rs (300s TTL, shared Arc across requests)
//!     → dispatcher
//! ```
//!
//! # Design Decisions
//! - Configuration is immutable once loaded; changes appear on TTL expiry
//! - Required fields are checked in one place (schema construction)
//! - The store trait keeps the parameter backend swappable and testable

pub mod cache;
pub mod schema;
pub mod store;

pub use cache::{ConfigCache, CONFIG_TTL};
pub use schema::GatewayConfiguration;
pub use store::{DirStore, MemoryStore, SecretStore};
