use axum::extract::{Extension, State};
use axum::routing::get;
use axum::{Json, Router};

use auth::model::Principal;
use taskboard_core::ServiceError;

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/board", get(my_boards))
        .route("/me/invitations", get(my_invitations))
        .route("/me/invitations/past", get(my_past_invitations))
}

/// GET /me/board — boards the caller belongs to, in any role.
async fn my_boards(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let boards = svc
        .boards_for_user(principal.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": boards})))
}

/// GET /me/invitations — pending invitations addressed to the caller.
async fn my_invitations(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let invitations = svc
        .pending_invitations_for_user(principal.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": invitations})))
}

/// GET /me/invitations/past — settled invitations, for history views.
async fn my_past_invitations(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let invitations = svc
        .past_invitations_for_user(principal.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": invitations})))
}
