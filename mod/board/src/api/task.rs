use axum::extract::{Extension, Path, State};
use axum::routing::get;
use axum::{Json, Router};

use auth::model::Principal;
use taskboard_core::ServiceError;

use crate::api::AppState;
use crate::model::{CreateTask, UpdateTask};
use crate::service::access::{ANY_BOARD_ROLES, EDIT_BOARD_ROLES};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/board/{id}/task", get(tasks_for_board))
        .route("/list/{id}/task", get(tasks_for_list).post(create_task))
        .route(
            "/task/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

/// POST /list/{id}/task — add a task (edit roles).
async fn create_task(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<i64>,
    Json(input): Json<CreateTask>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let board_id = svc.board_id_of_list(list_id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, EDIT_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let task = svc
        .create_task(list_id, principal.user_id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(task).unwrap()),
    ))
}

/// GET /board/{id}/task — all tasks on a board, across lists (any board role).
async fn tasks_for_board(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(board_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_board_role(&principal, board_id, ANY_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let tasks = svc.tasks_for_board(board_id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": tasks})))
}

/// GET /list/{id}/task — tasks in a list (any board role).
async fn tasks_for_list(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let board_id = svc.board_id_of_list(list_id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, ANY_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let tasks = svc.tasks_for_list(list_id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": tasks})))
}

/// GET /task/{id} — one task (any board role).
async fn get_task(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let board_id = svc.board_id_of_task(id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, ANY_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let task = svc.get_task(id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(task).unwrap()))
}

/// PATCH /task/{id} — update workflow fields (edit roles).
async fn update_task(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateTask>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let board_id = svc.board_id_of_task(id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, EDIT_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    let task = svc.update_task(id, update).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(task).unwrap()))
}

/// DELETE /task/{id} — remove a task (edit roles).
async fn delete_task(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, ServiceError> {
    let board_id = svc.board_id_of_task(id).map_err(ServiceError::from)?;
    svc.require_board_role(&principal, board_id, EDIT_BOARD_ROLES)
        .map_err(ServiceError::from)?;
    svc.delete_task(id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
