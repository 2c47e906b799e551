//! Board module — boards, memberships, invitations, lists and tasks.
//!
//! # Resources
//!
//! - **Board** — the access boundary; every role here is scoped to one board
//! - **BoardMember** — (user, board, role) row; one per (user, board). The
//!   ground truth the role gate reads
//! - **Invitation** — `pending → accepted | declined`; accepting grants a
//!   `viewer` membership in the same transaction
//! - **List** / **Task** — resources gated through their board, resolved
//!   transitively
//!
//! The module builds on the auth module: it shares its SQL store and calls
//! into [`auth::service::AuthService`] for role lookups and the global
//! permission gate.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use auth::service::AuthService;
use taskboard_core::Module;

use crate::service::BoardService;

/// Board module implementing the Module trait.
pub struct BoardModule {
    service: Arc<BoardService>,
}

impl BoardModule {
    /// Create a new BoardModule on top of the auth service, initializing
    /// its schema.
    pub fn new(auth: Arc<AuthService>) -> Result<Self, taskboard_core::ServiceError> {
        let service = BoardService::new(auth).map_err(taskboard_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying BoardService.
    pub fn service(&self) -> &Arc<BoardService> {
        &self.service
    }
}

impl Module for BoardModule {
    fn name(&self) -> &str {
        "board"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
