//! Auth module — registration, JWT session identity, and global RBAC.
//!
//! # Resources
//!
//! - **User** — identity with email + one-way password hash
//! - **Role** — named entity carrying a flat permission list; global roles
//!   (`admin`) grant platform permissions, board roles (`owner` /
//!   `contributor` / `viewer`) are markers resolved per board
//! - **RevokedToken** — ledger entry denying a spent refresh token
//!
//! Every protected request flows through [`service::AuthService::resolve`],
//! which turns the bearer token into a [`model::Principal`]. Handlers then
//! gate on permissions ([`service::AuthService::require_permissions`]) or,
//! for board-scoped resources, on the board module's role gate.
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let router = module.routes();
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use taskboard_core::Module;
use taskboard_sql::SQLStore;

use crate::service::{AuthConfig, AuthService};

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create a new AuthModule, initializing its schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        config: AuthConfig,
    ) -> Result<Self, taskboard_core::ServiceError> {
        let service = AuthService::new(sql, config).map_err(taskboard_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
