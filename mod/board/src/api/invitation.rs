use axum::extract::{Extension, Path, State};
use axum::routing::post;
use axum::{Json, Router};

use auth::model::Principal;
use taskboard_core::ServiceError;

use crate::api::AppState;
use crate::model::InviteRequest;
use crate::service::access::OWNER_BOARD_ROLES;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/board/{id}/invite", post(invite))
        .route("/invitation/{id}/accept", post(accept))
        .route("/invitation/{id}/decline", post(decline))
}

/// POST /board/{id}/invite — invite a user (owner).
async fn invite(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(input): Json<InviteRequest>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    svc.require_board_role(&principal, id, OWNER_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let invitation = svc
        .invite(id, input.user_id, principal.user_id)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(invitation).unwrap()),
    ))
}

/// POST /invitation/{id}/accept — addressee only; grants viewer.
async fn accept(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let invitation = svc
        .accept_invitation(id, principal.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(invitation).unwrap()))
}

/// POST /invitation/{id}/decline — addressee only.
async fn decline(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let invitation = svc
        .decline_invitation(id, principal.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(invitation).unwrap()))
}
