use axum::extract::{Extension, State};
use axum::routing::get;
use axum::{Json, Router};

use taskboard_core::ServiceError;

use crate::api::AppState;
use crate::model::Principal;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me/user", get(me))
}

/// GET /me/user — the authenticated user's own record.
async fn me(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(principal.user_id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user.to_response()).unwrap()))
}
