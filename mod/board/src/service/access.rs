use auth::model::{Principal, ROLE_CONTRIBUTOR, ROLE_OWNER, ROLE_VIEWER};
use taskboard_sql::Value;

use crate::service::{BoardError, BoardService};

/// Roles granting read access to a board's resources.
pub const ANY_BOARD_ROLES: &[&str] = &[ROLE_OWNER, ROLE_CONTRIBUTOR, ROLE_VIEWER];

/// Roles granting write access to a board's resources.
pub const EDIT_BOARD_ROLES: &[&str] = &[ROLE_OWNER, ROLE_CONTRIBUTOR];

/// Roles granting board administration (settings, members, invitations).
pub const OWNER_BOARD_ROLES: &[&str] = &[ROLE_OWNER];

impl BoardService {
    /// Board-scoped role gate. Pure decision function over the caller's
    /// membership row; global permissions play no part here.
    ///
    /// Order matters for the error taxonomy: a missing board or an
    /// unknown role name is `NotFound`, a non-member is `Forbidden("not a
    /// member...")`, a member with the wrong role is `Forbidden` too but
    /// with a distinguishable message.
    pub fn require_board_role(
        &self,
        principal: &Principal,
        board_id: i64,
        required: &[&str],
    ) -> Result<(), BoardError> {
        self.get_board(board_id)?;

        let mut required_ids = Vec::with_capacity(required.len());
        for name in required {
            required_ids.push(self.auth.get_role_by_name(name)?.id);
        }

        let member = self
            .get_member(principal.user_id, board_id)?
            .ok_or_else(|| BoardError::Forbidden("Not a member of this board".into()))?;

        if required_ids.contains(&member.role_id) {
            Ok(())
        } else {
            Err(BoardError::Forbidden("Insufficient board role".into()))
        }
    }

    /// Resolve a list to its board. A missing list is `NotFound`, never
    /// `Forbidden` — the gate runs after resolution.
    pub fn board_id_of_list(&self, list_id: i64) -> Result<i64, BoardError> {
        let rows = self.sql.query(
            "SELECT board_id FROM lists WHERE id = ?1",
            &[Value::Integer(list_id)],
        )?;
        rows.first()
            .and_then(|r| r.get_i64("board_id"))
            .ok_or_else(|| BoardError::NotFound("List does not exist".into()))
    }

    /// Resolve a task to its board.
    pub fn board_id_of_task(&self, task_id: i64) -> Result<i64, BoardError> {
        let rows = self.sql.query(
            "SELECT board_id FROM tasks WHERE id = ?1",
            &[Value::Integer(task_id)],
        )?;
        rows.first()
            .and_then(|r| r.get_i64("board_id"))
            .ok_or_else(|| BoardError::NotFound("Task does not exist".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateBoard;
    use crate::service::tests::{register_user, test_service};
    use auth::model::ROLE_ADMIN;

    fn principal_for(user: &auth::model::User) -> Principal {
        Principal {
            user_id: user.id,
            permissions: vec![],
        }
    }

    #[test]
    fn test_owner_passes_all_gates() {
        let svc = test_service();
        let alice = register_user(&svc, "alice@example.com");
        let board = svc
            .create_board(
                alice.id,
                CreateBoard {
                    name: "Sprint".into(),
                    description: None,
                },
            )
            .unwrap();
        let p = principal_for(&alice);

        svc.require_board_role(&p, board.id, ANY_BOARD_ROLES).unwrap();
        svc.require_board_role(&p, board.id, EDIT_BOARD_ROLES).unwrap();
        svc.require_board_role(&p, board.id, OWNER_BOARD_ROLES).unwrap();
    }

    #[test]
    fn test_non_member_is_forbidden_regardless_of_global_roles() {
        let svc = test_service();
        let alice = register_user(&svc, "alice@example.com");
        let bob = register_user(&svc, "bob@example.com");
        svc.auth().assign_role(bob.id, ROLE_ADMIN).unwrap();
        let board = svc
            .create_board(
                alice.id,
                CreateBoard {
                    name: "Sprint".into(),
                    description: None,
                },
            )
            .unwrap();

        // Platform admin, but no membership row: Forbidden.
        let p = Principal {
            user_id: bob.id,
            permissions: svc.auth().permissions_for_user(bob.id).unwrap(),
        };
        let err = svc
            .require_board_role(&p, board.id, ANY_BOARD_ROLES)
            .unwrap_err();
        assert!(matches!(err, BoardError::Forbidden(_)));
    }

    #[test]
    fn test_viewer_reads_but_cannot_edit() {
        let svc = test_service();
        let alice = register_user(&svc, "alice@example.com");
        let carol = register_user(&svc, "carol@example.com");
        let board = svc
            .create_board(
                alice.id,
                CreateBoard {
                    name: "Sprint".into(),
                    description: None,
                },
            )
            .unwrap();
        let invitation = svc.invite(board.id, carol.id, alice.id).unwrap();
        svc.accept_invitation(invitation.id, carol.id).unwrap();

        // A member with the wrong role is still Forbidden, but the message
        // distinguishes it from a non-member.
        let p = principal_for(&carol);
        svc.require_board_role(&p, board.id, ANY_BOARD_ROLES).unwrap();
        for required in [EDIT_BOARD_ROLES, OWNER_BOARD_ROLES] {
            let err = svc.require_board_role(&p, board.id, required).unwrap_err();
            assert!(matches!(
                &err,
                BoardError::Forbidden(msg) if msg == "Insufficient board role"
            ));
        }
    }

    #[test]
    fn test_missing_board_and_role_are_not_found() {
        let svc = test_service();
        let alice = register_user(&svc, "alice@example.com");
        let board = svc
            .create_board(
                alice.id,
                CreateBoard {
                    name: "Sprint".into(),
                    description: None,
                },
            )
            .unwrap();
        let p = principal_for(&alice);

        let err = svc
            .require_board_role(&p, 9999, ANY_BOARD_ROLES)
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));

        // Unknown role name in the requirement is a configuration error,
        // surfaced as NotFound rather than a silent deny.
        let err = svc
            .require_board_role(&p, board.id, &["archivist"])
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
    }

    #[test]
    fn test_transitive_resolution_reports_missing_hops() {
        let svc = test_service();
        assert!(matches!(
            svc.board_id_of_list(42).unwrap_err(),
            BoardError::NotFound(_)
        ));
        assert!(matches!(
            svc.board_id_of_task(42).unwrap_err(),
            BoardError::NotFound(_)
        ));
    }
}
