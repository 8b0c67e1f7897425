//! Upstream registry access.
//!
//! # Data Flow
//! ```text
//! RouteDecision::upstream_path
//!     → UpstreamRequestSpec (GET, fixed headers)
//!     → client.rs (one HTTPS exchange, body read to completion)
//!     → UpstreamResponse | UpstreamError
//! ```
//!
//! # Design Decisions
//! - No retries: one request in, one upstream call out
//! - Transport failures are a distinct error, never a status code
//! - Redirects are not followed; 3xx answers are reported as-is

pub mod client;

pub use client::{UpstreamClient, UpstreamError, UpstreamRequestSpec, UpstreamResponse};
