//! Upstream execution engine.

pub mod client;

pub use client::UpstreamClient;
