//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all handler
//! - Wire up middleware (CORS headers, request ID, tracing, timeout)
//! - Bind server to listener, stop on shutdown signal
//! - Answer preflights, route, call upstream, format the response

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::request_id;
use crate::http::response::{
    self, ResponseMode, CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN,
};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{QueryParams, RouteDecision};
use crate::transcode::{FieldExtractor, SimpleTagExtractor};
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamRequestSpec};

/// Autocomplete bodies are logged up to this many characters.
const PREVIEW_CHARS: usize = 500;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub extractor: Arc<dyn FieldExtractor>,
}

/// HTTP server for the address gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server using the default XML extractor.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        Self::with_extractor(config, Arc::new(SimpleTagExtractor))
    }

    /// Create a server with a custom detail-route extractor.
    pub fn with_extractor(
        config: GatewayConfig,
        extractor: Arc<dyn FieldExtractor>,
    ) -> Result<Self, UpstreamError> {
        let state = AppState {
            upstream: UpstreamClient::new(&config.upstream)?,
            extractor,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            // Outermost, so error and timeout responses carry them too.
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(CORS_ALLOW_ORIGIN),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(CORS_ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(CORS_ALLOW_HEADERS),
            ))
    }

    /// Run the server until the shutdown receiver fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway running at http://{}/", addr);
        tracing::info!("Test: http://{}/autocomplete?adresa=Praha", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main gateway handler.
/// Answers preflights, classifies the request and relays it upstream.
async fn gateway_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    if method == Method::OPTIONS {
        metrics::record_request("preflight", 204, start_time);
        return response::preflight();
    }

    let params = QueryParams::parse(uri.query());
    let decision = RouteDecision::classify(uri.path(), &params);
    let route = decision.name();

    let path = match decision.upstream_path() {
        Ok(path) => path,
        Err(rejection) => {
            tracing::debug!(
                request_id = %request_id,
                path = %uri.path(),
                reason = %rejection.message(),
                "Request rejected"
            );
            metrics::record_request(route, rejection.status().as_u16(), start_time);
            return response::rejection(rejection);
        }
    };
    let mode = match decision {
        RouteDecision::Detail { .. } => ResponseMode::FlatJson,
        _ => ResponseMode::Passthrough,
    };
    let spec = UpstreamRequestSpec::get(path);

    if let Ok(url) = state.upstream.url_for(&spec) {
        tracing::info!(request_id = %request_id, target = %url, "Forwarding");
    }

    let upstream = match state.upstream.fetch(&spec).await {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                route,
                timeout = e.is_timeout(),
                error = %e,
                "Upstream request failed"
            );
            metrics::record_upstream_error(route);
            metrics::record_request(route, 500, start_time);
            return response::transport_error(&e);
        }
    };

    let status = upstream.status;
    if mode == ResponseMode::FlatJson && status != StatusCode::OK {
        tracing::warn!(request_id = %request_id, status = %status, "Upstream rejected detail request");
    } else {
        tracing::info!(request_id = %request_id, status = %status, "Upstream response");
    }
    if mode == ResponseMode::Passthrough && tracing::enabled!(tracing::Level::DEBUG) {
        let text = upstream.text();
        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        tracing::debug!(request_id = %request_id, preview = %preview, "Autocomplete response body");
    }

    let response = response::from_upstream(mode, upstream, state.extractor.as_ref());
    metrics::record_request(route, response.status().as_u16(), start_time);
    response
}
