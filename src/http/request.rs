//! Request validation for `POST /rank-user`.
//!
//! `userId` may arrive as a string or a positive integer; `rankValue` must be
//! a JSON number with no fractional part (`50` and `50.0` are the same rank).
//! Range checking of the rank is left to the ranking service.

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::http::response::GatewayError;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

const MISSING_PARAMS: &str =
    "Missing required parameters: userId (string) and rankValue (number).";

/// Body as sent by the caller, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RankRequestBody {
    #[serde(rename = "userId", default)]
    pub user_id: Option<Value>,
    #[serde(rename = "rankValue", default)]
    pub rank_value: Option<Value>,
}

/// A validated rank request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRequest {
    pub user_id: String,
    pub rank_value: i64,
}

impl TryFrom<RankRequestBody> for RankRequest {
    type Error = GatewayError;

    fn try_from(body: RankRequestBody) -> Result<Self, Self::Error> {
        let user_id = match body.user_id {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::Number(n)) if n.as_u64().is_some_and(|id| id > 0) => n.to_string(),
            _ => return Err(GatewayError::Validation(MISSING_PARAMS.to_string())),
        };

        let rank_value = match body.rank_value {
            Some(Value::Number(n)) => whole_number(&n).ok_or_else(|| {
                GatewayError::Validation(format!(
                    "Invalid rank value {}. Must be an integer between 0 and 255.",
                    n
                ))
            })?,
            _ => return Err(GatewayError::Validation(MISSING_PARAMS.to_string())),
        };

        Ok(Self {
            user_id,
            rank_value,
        })
    }
}

/// `n` as an `i64` when it has no fractional part and fits.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}
