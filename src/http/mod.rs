//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handler)
//!     → request.rs (request ID assigned or kept)
//!     → routing (classify path + query)
//!     → upstream (one registry call)
//!     → response.rs (passthrough or transcoded JSON, CORS headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ResponseMode;
pub use server::{AppState, HttpServer};
