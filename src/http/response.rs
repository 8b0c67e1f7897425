//! Response formatting.
//!
//! # Responsibilities
//! - Shape the client response for each route
//! - Wrap client and upstream errors in a JSON envelope
//! - Provide the CORS header values applied to every response
//!
//! # Design Decisions
//! - Upstream bodies are fully buffered before a response is built
//! - Autocomplete answers are relayed byte for byte
//! - Only a 200 detail answer is transcoded; anything else becomes an error envelope

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::routing::Rejection;
use crate::transcode::FieldExtractor;
use crate::upstream::{UpstreamError, UpstreamResponse};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Accept";

/// Content type used when the upstream does not name one.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// How an upstream answer is turned into the client response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Status, content type and body relayed unchanged.
    Passthrough,
    /// XML body transcoded into a flat JSON object.
    FlatJson,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// CORS preflight answer: 204, no body.
pub fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Answer for a request the router refused.
pub fn rejection(rejection: Rejection) -> Response {
    match rejection {
        Rejection::MissingParameter(_) => json_error(rejection.status(), rejection.message()),
        Rejection::NotFound => (rejection.status(), rejection.message()).into_response(),
    }
}

/// Answer for an upstream exchange that produced no status.
pub fn transport_error(err: &UpstreamError) -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// Build the client response from a received upstream answer.
pub fn from_upstream(
    mode: ResponseMode,
    upstream: UpstreamResponse,
    extractor: &dyn FieldExtractor,
) -> Response {
    match mode {
        ResponseMode::Passthrough => passthrough(upstream),
        ResponseMode::FlatJson => flat_json(upstream, extractor),
    }
}

fn passthrough(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type()
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    (
        upstream.status,
        [(header::CONTENT_TYPE, content_type)],
        Body::from(upstream.body),
    )
        .into_response()
}

fn flat_json(upstream: UpstreamResponse, extractor: &dyn FieldExtractor) -> Response {
    if upstream.status != StatusCode::OK {
        return json_error(
            upstream.status,
            format!("Upstream returned {}", upstream.status.as_u16()),
        );
    }

    let fields = extractor.extract(&upstream.text());
    (StatusCode::OK, Json(fields)).into_response()
}
