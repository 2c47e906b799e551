use axum::extract::{Extension, Path, State};
use axum::routing::get;
use axum::{Json, Router};

use auth::model::Principal;
use taskboard_core::ServiceError;

use crate::api::AppState;
use crate::model::{CreateList, UpdateList};
use crate::service::access::{ANY_BOARD_ROLES, EDIT_BOARD_ROLES};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/board/{id}/list", get(lists_for_board).post(create_list))
        .route(
            "/list/{id}",
            get(get_list).patch(update_list).delete(delete_list),
        )
}

/// POST /board/{id}/list — add a list (edit roles).
async fn create_list(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(board_id): Path<i64>,
    Json(input): Json<CreateList>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    svc.require_board_role(&principal, board_id, EDIT_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let list = svc.create_list(board_id, input).map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(list).unwrap()),
    ))
}

/// GET /board/{id}/list — lists on a board (any board role).
async fn lists_for_board(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(board_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_board_role(&principal, board_id, ANY_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let lists = svc.lists_for_board(board_id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": lists})))
}

/// GET /list/{id} — one list; the board is resolved transitively before
/// the gate runs, so a missing list is 404 rather than 403.
async fn get_list(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let board_id = svc.board_id_of_list(id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, ANY_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let list = svc.get_list(id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(list).unwrap()))
}

/// PATCH /list/{id} — rename/redescribe (edit roles).
async fn update_list(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateList>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let board_id = svc.board_id_of_list(id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, EDIT_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let list = svc.update_list(id, update).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(list).unwrap()))
}

/// DELETE /list/{id} — remove a list and its tasks (edit roles).
async fn delete_list(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, ServiceError> {
    let board_id = svc.board_id_of_list(id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, EDIT_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    svc.delete_list(id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
