//! Response envelopes and error to status mapping.
//!
//! Every reply is JSON: `{success: true, message, data}` or
//! `{success: false, error}`.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::opencloud::GroupMembershipRole;
use crate::ranking::RankingError;

/// Successful reply body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> SuccessBody<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Failed reply body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// `data` of a successful `POST /rank-user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub user_id: String,
    pub display_name: String,
    pub rank: u8,
}

impl RankedUser {
    pub fn new(user_id: impl Into<String>, role: GroupMembershipRole) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: role.display_name,
            rank: role.rank,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "User {} successfully ranked to {} (Rank {}).",
            self.user_id, self.display_name, self.rank
        )
    }
}

/// Everything the gateway can answer with besides success.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or wrong bearer token, or no server secret configured.
    #[error("Unauthorized: Invalid or missing server authorization key.")]
    Unauthorized,

    /// Malformed client input.
    #[error("{0}")]
    Validation(String),

    #[error("Request body too large.")]
    PayloadTooLarge,

    /// The request outlived `timeouts.request_secs`.
    #[error("Request timed out before the ranking operation completed.")]
    Timeout,

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Ranking(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            GatewayError::Ranking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Ranking(e) if !e.is_client_error() => {
                format!("Ranking failed due to a server or API error: {}", e)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.client_message()))).into_response()
    }
}

/// Rewrite error responses that did not come from a handler (body limit,
/// timeout, unknown route) into the `{success: false, error}` shape.
pub async fn json_error_envelope(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let error = match status {
        StatusCode::PAYLOAD_TOO_LARGE => GatewayError::PayloadTooLarge.client_message(),
        StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout.client_message(),
        other => other.canonical_reason().unwrap_or("Request failed").to_string(),
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let body = Body::from(serde_json::to_vec(&ErrorBody::new(error)).unwrap_or_default());
    Response::from_parts(parts, body)
}
