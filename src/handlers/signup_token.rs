use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::signup::SignupPayload;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupTokenRequest {
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupTokenResponse {
    pub token: String,
    pub plan_id: String,
    pub iat: i64,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// POST /api/signup-token - issue a token to pass as the checkout client reference id
pub async fn signup_token_post(
    State(state): State<AppState>,
    body: Result<Json<SignupTokenRequest>, JsonRejection>,
) -> ApiResult<SignupTokenResponse> {
    let Json(request) = body?;

    let plan_id = request.plan_id.trim();
    if plan_id.is_empty() {
        return Err(ApiError::field_error("planId", "Plan id is required"));
    }

    let (token, payload) = state.signup.issue(plan_id)?;
    Ok(ApiResponse::created(SignupTokenResponse { token, plan_id: payload.plan_id, iat: payload.iat }))
}

/// POST /api/signup-token/verify - every failure is reported as INVALID_TOKEN
pub async fn signup_token_verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> ApiResult<SignupPayload> {
    let Json(request) = body?;

    state
        .signup
        .verify(request.token.trim())
        .map(ApiResponse::success)
        .ok_or(ApiError::InvalidToken)
}
