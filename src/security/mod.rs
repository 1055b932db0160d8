//! Security perimeter.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (sliding-window per-IP limits)
//!     → validate.rs (payload bound, header/path content, path sanitizing)
//!     → origin.rs (single-origin SSRF allow-list)
//!     → Pass to dispatch
//!
//! Outgoing errors/logs:
//!     → redact.rs (secret scrubbing)
//! ```
//!
//! # Design Decisions
//! - Fail closed: first failed check short-circuits the request
//! - No trust in client input
//! - Redaction is applied before anything leaves the process

pub mod origin;
pub mod rate_limit;
pub mod redact;
pub mod validate;

pub use origin::is_authorized;
pub use rate_limit::RateLimiter;
pub use redact::{mask_body, redact_message, REDACTION_MARKER};
pub use validate::{sanitize_path, validate_payload_size, validate_string, MAX_PAYLOAD_BYTES};
