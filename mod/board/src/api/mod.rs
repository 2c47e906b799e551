mod board;
mod invitation;
mod list;
mod me;
mod task;

use std::sync::Arc;

use axum::Router;

use crate::service::BoardService;

/// Shared application state.
pub type AppState = Arc<BoardService>;

/// Build the complete board API router. Every route here is protected, so
/// the auth module's bearer middleware is layered over the whole router.
pub fn build_router(svc: Arc<BoardService>) -> Router {
    let auth_state = svc.auth().clone();
    Router::new()
        .merge(board::routes())
        .merge(invitation::routes())
        .merge(list::routes())
        .merge(task::routes())
        .merge(me::routes())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth::api::middleware::auth_middleware,
        ))
        .with_state(svc)
}
