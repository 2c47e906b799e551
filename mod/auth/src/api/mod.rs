mod auth;
mod me;
pub mod middleware;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the complete auth API router.
///
/// Routes are absolute; the binary merges module routers side by side, so
/// the bearer middleware layered here only guards this module's routes.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(me::routes())
        .layer(axum::middleware::from_fn_with_state(
            svc.clone(),
            middleware::auth_middleware,
        ))
        .with_state(svc)
}
