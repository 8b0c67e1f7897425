//! Route classification.
//!
//! # Responsibilities
//! - Map path + query parameters to a RouteDecision
//! - Validate required parameters
//! - Build the upstream path for accepted routes
//!
//! # Design Decisions
//! - Immutable decision, constructed once per request
//! - Explicit Rejected variant rather than silent default

use axum::http::StatusCode;

use crate::routing::query::QueryParams;

/// Usage hint returned for unknown paths.
pub const NOT_FOUND_HINT: &str = "Not Found. Use /autocomplete?adresa=... or /detail?kod=...";

const AUTOCOMPLETE_PATH: &str = "/autocomplete";
const DETAIL_PATH: &str = "/detail";

/// Outcome of routing one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Full-text address search, answered with the raw upstream body.
    Autocomplete { query: String },
    /// Address point export, answered with the transcoded field map.
    Detail { code: String },
    Rejected(Rejection),
}

/// Why a request was not routed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A required query parameter is missing or empty.
    MissingParameter(&'static str),
    NotFound,
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Rejection::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Rejection::MissingParameter(name) => format!("Missing {name} parameter"),
            Rejection::NotFound => NOT_FOUND_HINT.to_string(),
        }
    }
}

impl RouteDecision {
    /// Classify a request by its path and decoded query.
    pub fn classify(path: &str, query: &QueryParams) -> Self {
        match path {
            AUTOCOMPLETE_PATH => match query.non_empty("adresa") {
                Some(q) => RouteDecision::Autocomplete { query: q.to_string() },
                None => RouteDecision::Rejected(Rejection::MissingParameter("adresa")),
            },
            DETAIL_PATH => match query.non_empty("kod") {
                Some(code) => RouteDecision::Detail { code: code.to_string() },
                None => RouteDecision::Rejected(Rejection::MissingParameter("kod")),
            },
            _ => RouteDecision::Rejected(Rejection::NotFound),
        }
    }

    /// Label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            RouteDecision::Autocomplete { .. } => "autocomplete",
            RouteDecision::Detail { .. } => "detail",
            RouteDecision::Rejected(_) => "rejected",
        }
    }

    /// Path and query on the upstream host, or the rejection to answer with.
    pub fn upstream_path(&self) -> Result<String, Rejection> {
        match self {
            RouteDecision::Autocomplete { query } => Ok(autocomplete_path(query)),
            RouteDecision::Detail { code } => Ok(detail_path(code)),
            RouteDecision::Rejected(rejection) => Err(*rejection),
        }
    }
}

/// Full-text search path; the search text is percent-encoded.
fn autocomplete_path(query: &str) -> String {
    format!(
        "/vdp/ruian/adresnimista/fulltext?adresa={}",
        urlencoding::encode(query)
    )
}

/// XML export path. The address code is embedded as given, except `#`,
/// which would end the query and drop `mediaType`.
fn detail_path(code: &str) -> String {
    let code = code.replace('#', "%23");
    format!("/vdp/ruian/adresnimista?kodAd={code}&mediaType=xml")
}
