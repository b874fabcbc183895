use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crate::http::response::GatewayError;
use crate::http::server::AppState;

/// Reject requests whose `Authorization` header is not exactly
/// `Bearer <server secret>`. With no secret configured nothing gets through.
pub async fn require_server_secret(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(secret) = state.server_secret.as_deref() else {
        tracing::warn!("Rejecting request: no server secret configured");
        return GatewayError::Unauthorized.into_response();
    };

    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if let Some(auth_val) = auth_header {
        if auth_val == format!("Bearer {}", secret) {
            return next.run(request).await;
        }
    }

    tracing::warn!(path = %request.uri().path(), "Rejecting request with invalid authorization");
    GatewayError::Unauthorized.into_response()
}
