use axum::extract::{Extension, Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};

use taskboard_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{permission, Principal, RegisterRequest, UpdateUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users).post(create_user))
        .route(
            "/user/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route(
            "/user/{id}/role/{role_name}",
            put(assign_role).delete(unassign_role),
        )
        .route("/role", get(list_roles))
}

/// GET /user — list all users (admin).
async fn list_users(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_permissions(&principal, &[permission::VIEW_ALL_USERS])
        .map_err(ServiceError::from)?;
    let result = svc.list_users(&params).map_err(ServiceError::from)?;
    let items: Vec<_> = result.items.iter().map(|u| u.to_response()).collect();
    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
    })))
}

/// POST /user — create an account on someone's behalf (admin). Same
/// shape as self-registration, without handing out tokens.
async fn create_user(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    svc.require_permissions(&principal, &[permission::CREATE_USER])
        .map_err(ServiceError::from)?;
    let user = svc.register(input).map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(user.to_response()).unwrap()),
    ))
}

/// GET /user/{id} — fetch one user (admin).
async fn get_user(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_permissions(&principal, &[permission::VIEW_ALL_USERS])
        .map_err(ServiceError::from)?;
    let user = svc.get_user(id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user.to_response()).unwrap()))
}

/// PATCH /user/{id} — update name/email/password (admin). Unknown fields
/// are rejected at deserialization.
async fn update_user(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_permissions(&principal, &[permission::UPDATE_USER])
        .map_err(ServiceError::from)?;
    let user = svc.update_user(id, update).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user.to_response()).unwrap()))
}

/// DELETE /user/{id} — remove a user; memberships and role assignments
/// cascade (admin).
async fn delete_user(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.require_permissions(&principal, &[permission::DELETE_USER])
        .map_err(ServiceError::from)?;
    svc.delete_user(id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// PUT /user/{id}/role/{role_name} — grant a global role (admin).
async fn assign_role(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, role_name)): Path<(i64, String)>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.require_permissions(&principal, &[permission::ASSIGN_ROLE])
        .map_err(ServiceError::from)?;
    svc.assign_role(id, &role_name).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// DELETE /user/{id}/role/{role_name} — revoke a global role (admin).
async fn unassign_role(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, role_name)): Path<(i64, String)>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.require_permissions(&principal, &[permission::ASSIGN_ROLE])
        .map_err(ServiceError::from)?;
    svc.unassign_role(id, &role_name).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// GET /role — list the role catalog (admin).
async fn list_roles(
    State(svc): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.require_permissions(&principal, &[permission::VIEW_ROLES])
        .map_err(ServiceError::from)?;
    let roles = svc.list_roles().map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": roles})))
}
