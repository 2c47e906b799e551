use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use taskboard_core::ServiceError;

use crate::api::AppState;
use crate::model::{LoginRequest, RefreshRequest, RegisterRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// POST /auth/register — create an account. No roles are granted.
async fn register(
    State(svc): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let user = svc.register(input).map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(user.to_response()).unwrap()),
    ))
}

/// POST /auth/login — exchange credentials for a token pair.
async fn login(
    State(svc): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc
        .authenticate(&input.email, &input.password)
        .map_err(ServiceError::from)?;
    let tokens = svc.issue_tokens(&user).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(tokens).unwrap()))
}

/// POST /auth/refresh — rotate a refresh token into a new pair.
async fn refresh(
    State(svc): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let tokens = svc
        .refresh_tokens(&input.refresh_token)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(tokens).unwrap()))
}

/// POST /auth/logout — revoke a refresh token. The token itself
/// authenticates the request, so the route is public.
async fn logout(
    State(svc): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.logout(&input.refresh_token).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
