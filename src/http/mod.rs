//! HTTP protocol handling.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch state machine)
//!     → context.rs (canonical immutable request descriptor)
//!     → headers.rs (CloudFlare service token + forwarded whitelist)
//!     → [upstream engine performs the call]
//!     → response.rs (hardened headers, secret-redacted errors)
//!     → Send to client
//! ```

pub mod context;
pub mod headers;
pub mod response;
pub mod server;

pub use context::RequestContext;
pub use response::{GatewayResponse, Severity};
pub use server::Gateway;
