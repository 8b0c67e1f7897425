//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query string)
//!     → query.rs (decode parameters, last value wins)
//!     → router.rs (classify into a RouteDecision)
//!     → Return: Autocomplete | Detail | Rejected
//! ```
//!
//! # Design Decisions
//! - Exact path matching, two fixed routes
//! - Method is not inspected here; OPTIONS is answered before routing
//! - Deterministic: same input always yields the same decision
//! - Upstream paths are built from fixed templates per route

pub mod query;
pub mod router;

pub use query::QueryParams;
pub use router::{Rejection, RouteDecision, NOT_FOUND_HINT};
