use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::http::request::{RankRequest, RankRequestBody};
use crate::http::response::{GatewayError, RankedUser, SuccessBody};
use crate::http::server::AppState;

/// `POST /rank-user`. Runs behind [`require_server_secret`](crate::http::auth::require_server_secret).
pub async fn rank_user(
    State(state): State<AppState>,
    payload: Result<Json<RankRequestBody>, JsonRejection>,
) -> Result<Json<SuccessBody<RankedUser>>, GatewayError> {
    let Json(body) = payload.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => GatewayError::PayloadTooLarge,
        _ => GatewayError::Validation(format!("Invalid request body: {}", rejection.body_text())),
    })?;
    let request = RankRequest::try_from(body)?;

    match state
        .ranking
        .set_rank_by_rank_value(&request.user_id, request.rank_value)
        .await
    {
        Ok(role) => {
            let ranked = RankedUser::new(request.user_id, role);
            Ok(Json(SuccessBody::new(ranked.message(), ranked)))
        }
        Err(e) => {
            tracing::error!(
                user_id = %request.user_id,
                rank_value = request.rank_value,
                error = %e,
                "Ranking operation failed"
            );
            Err(e.into())
        }
    }
}
