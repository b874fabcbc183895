//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Guard `/rank-user` with the server secret
//! - Bind server to listener and drain on shutdown

use axum::{
    body::Body,
    http::{HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::auth::require_server_secret;
use crate::http::health::get_health;
use crate::http::rank::rank_user;
use crate::http::request::X_REQUEST_ID;
use crate::http::response::json_error_envelope;
use crate::observability::metrics;
use crate::opencloud::{OpenCloudClient, OpenCloudResult};
use crate::ranking::{RankingService, RoleCache};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub ranking: RankingService,
    pub server_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(ranking: RankingService, server_secret: Option<&str>) -> Self {
        Self {
            ranking,
            server_secret: server_secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }
}

/// HTTP server for the rank gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server around an already built ranking service.
    pub fn new(config: GatewayConfig, ranking: RankingService) -> Self {
        let state = AppState::new(ranking, config.auth.server_secret.as_deref());
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Create a server talking to Open Cloud as configured.
    pub fn from_config(config: GatewayConfig) -> OpenCloudResult<Self> {
        let client = OpenCloudClient::new(&config.opencloud)?;
        let ranking = RankingService::new(
            Arc::new(client),
            config.opencloud.group_id.clone(),
            Arc::new(RoleCache::new()),
        );
        Ok(Self::new(config, ranking))
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        if self.config.auth.server_secret.is_none() {
            tracing::warn!("SERVER_AUTH_KEY is not set; every ranking request will be rejected");
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// The bearer check wraps the body limit, so an unauthenticated caller gets
/// 401 whatever it sends. Rejections from the limit and the timeout pass
/// through [`json_error_envelope`].
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    let ranking = Router::new()
        .route("/rank-user", post(rank_user))
        .route_layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_server_secret,
        ));

    Router::new()
        .merge(ranking)
        .route("/health", get(get_health))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(config.timeouts.request_secs),
        ))
        .layer(middleware::from_fn(json_error_envelope))
        .layer(middleware::from_fn(track_metrics))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                request_id = %request_id,
                method = %request.method(),
                path = %request.uri().path()
            )
        }))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    metrics::record_request(response.status().as_u16(), start);
    response
}
