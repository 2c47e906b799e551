use axum::extract::{Extension, Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use auth::model::{permission, Principal};
use taskboard_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CreateBoard, UpdateBoard, UpdateMemberRole};
use crate::service::access::{ANY_BOARD_ROLES, OWNER_BOARD_ROLES};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/board/create", post(create_board))
        .route("/board", get(list_all_boards))
        .route("/board/{id}/users", get(list_board_users))
        .route("/board/{id}/users/{user_id}", patch(update_member_role))
        .route("/board/update/{id}", patch(update_board))
        .route("/board/delete/{id}", axum::routing::delete(delete_board))
}

/// POST /board/create — any authenticated user; the creator becomes owner.
async fn create_board(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateBoard>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let board = svc
        .create_board(principal.user_id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(board).unwrap()),
    ))
}

/// GET /board — every board on the platform (admin).
async fn list_all_boards(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.auth()
        .require_permissions(&principal, &[permission::VIEW_ALL_BOARDS])
        .map_err(ServiceError::from)?;
    let result = svc.list_all_boards(&params).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

/// GET /board/{id}/users — members with roles (any board role).
async fn list_board_users(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_board_role(&principal, id, ANY_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let members = svc.list_board_users(id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": members})))
}

/// PATCH /board/{id}/users/{user_id} — change a member's role (owner).
async fn update_member_role(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, user_id)): Path<(i64, i64)>,
    Json(update): Json<UpdateMemberRole>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.require_board_role(&principal, id, OWNER_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    svc.update_member_role(id, user_id, update)
        .map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// PATCH /board/update/{id} — rename/redescribe (owner).
async fn update_board(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateBoard>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_board_role(&principal, id, OWNER_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let board = svc.update_board(id, update).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(board).unwrap()))
}

/// DELETE /board/delete/{id} — remove the board and everything on it
/// (owner).
async fn delete_board(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.require_board_role(&principal, id, OWNER_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    svc.delete_board(id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
