use auth::model::{ROLE_CONTRIBUTOR, ROLE_OWNER, ROLE_VIEWER};
use taskboard_sql::Value;

use crate::model::{BoardMember, BoardMemberView, UpdateMemberRole};
use crate::service::{BoardError, BoardService};

impl BoardService {
    /// The membership row for (user, board), if any.
    pub fn get_member(&self, user_id: i64, board_id: i64) -> Result<Option<BoardMember>, BoardError> {
        let rows = self.sql.query(
            "SELECT user_id, board_id, role_id FROM board_members
             WHERE user_id = ?1 AND board_id = ?2",
            &[Value::Integer(user_id), Value::Integer(board_id)],
        )?;
        Ok(rows.first().map(|row| BoardMember {
            user_id: row.get_i64("user_id").unwrap_or_default(),
            board_id: row.get_i64("board_id").unwrap_or_default(),
            role_id: row.get_i64("role_id").unwrap_or_default(),
        }))
    }

    /// Members of a board with user and role details joined in.
    pub fn list_board_users(&self, board_id: i64) -> Result<Vec<BoardMemberView>, BoardError> {
        self.get_board(board_id)?;
        let rows = self.sql.query(
            "SELECT u.id AS user_id, u.name, u.email, r.name AS role
             FROM board_members m
             JOIN users u ON u.id = m.user_id
             JOIN roles r ON r.id = m.role_id
             WHERE m.board_id = ?1
             ORDER BY u.id",
            &[Value::Integer(board_id)],
        )?;
        rows.iter()
            .map(|row| {
                Ok(BoardMemberView {
                    user_id: row
                        .get_i64("user_id")
                        .ok_or_else(|| BoardError::Internal("missing user_id column".into()))?,
                    name: row
                        .get_str("name")
                        .ok_or_else(|| BoardError::Internal("missing name column".into()))?
                        .to_string(),
                    email: row
                        .get_str("email")
                        .ok_or_else(|| BoardError::Internal("missing email column".into()))?
                        .to_string(),
                    role: row
                        .get_str("role")
                        .ok_or_else(|| BoardError::Internal("missing role column".into()))?
                        .to_string(),
                })
            })
            .collect()
    }

    /// Change a member's board role between `contributor` and `viewer`.
    ///
    /// The `owner` role is never set or unset here. Ownership transfer
    /// would be a dedicated operation with its own invariants; the generic
    /// update path refuses both directions with `Conflict`.
    pub fn update_member_role(
        &self,
        board_id: i64,
        user_id: i64,
        update: UpdateMemberRole,
    ) -> Result<(), BoardError> {
        self.get_board(board_id)?;

        if update.role == ROLE_OWNER {
            return Err(BoardError::Conflict("Cannot assign the owner role".into()));
        }
        if update.role != ROLE_CONTRIBUTOR && update.role != ROLE_VIEWER {
            return Err(BoardError::NotFound(format!(
                "Role {} does not exist",
                update.role
            )));
        }

        let member = self
            .get_member(user_id, board_id)?
            .ok_or_else(|| BoardError::NotFound("User is not a member of this board".into()))?;

        let current = self.auth.get_role(member.role_id)?;
        if current.name == ROLE_OWNER {
            return Err(BoardError::Conflict("Cannot change the owner role".into()));
        }

        let new_role = self.auth.get_role_by_name(&update.role)?;
        self.sql.exec(
            "UPDATE board_members SET role_id = ?1 WHERE user_id = ?2 AND board_id = ?3",
            &[
                Value::Integer(new_role.id),
                Value::Integer(user_id),
                Value::Integer(board_id),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateBoard;
    use crate::service::tests::{register_user, test_service};

    fn board_with_member(
        svc: &BoardService,
        role: &str,
    ) -> (crate::model::Board, auth::model::User) {
        let alice = register_user(svc, "alice@example.com");
        let bob = register_user(svc, "bob@example.com");
        let board = svc
            .create_board(
                alice.id,
                CreateBoard {
                    name: "Sprint".into(),
                    description: None,
                },
            )
            .unwrap();
        let role_id = svc.auth().get_role_by_name(role).unwrap().id;
        svc.sql
            .insert(
                "INSERT INTO board_members (user_id, board_id, role_id) VALUES (?1, ?2, ?3)",
                &[
                    Value::Integer(bob.id),
                    Value::Integer(board.id),
                    Value::Integer(role_id),
                ],
            )
            .unwrap();
        (board, bob)
    }

    #[test]
    fn test_list_board_users_joins_role_names() {
        let svc = test_service();
        let (board, _bob) = board_with_member(&svc, ROLE_VIEWER);

        let members = svc.list_board_users(board.id).unwrap();
        assert_eq!(members.len(), 2);
        let roles: Vec<_> = members.iter().map(|m| m.role.as_str()).collect();
        assert!(roles.contains(&"owner"));
        assert!(roles.contains(&"viewer"));
    }

    #[test]
    fn test_update_member_role_viewer_to_contributor() {
        let svc = test_service();
        let (board, bob) = board_with_member(&svc, ROLE_VIEWER);

        svc.update_member_role(
            board.id,
            bob.id,
            UpdateMemberRole {
                role: ROLE_CONTRIBUTOR.into(),
            },
        )
        .unwrap();

        let member = svc.get_member(bob.id, board.id).unwrap().unwrap();
        let role = svc.auth().get_role(member.role_id).unwrap();
        assert_eq!(role.name, ROLE_CONTRIBUTOR);
    }

    #[test]
    fn test_update_member_role_never_touches_owner() {
        let svc = test_service();
        let (board, bob) = board_with_member(&svc, ROLE_VIEWER);
        let alice = svc.get_board(board.id).unwrap().owner_id;

        // Promoting to owner is refused.
        let err = svc
            .update_member_role(
                board.id,
                bob.id,
                UpdateMemberRole {
                    role: ROLE_OWNER.into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::Conflict(_)));

        // Demoting the owner is refused.
        let err = svc
            .update_member_role(
                board.id,
                alice,
                UpdateMemberRole {
                    role: ROLE_VIEWER.into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::Conflict(_)));
    }

    #[test]
    fn test_update_member_role_missing_targets() {
        let svc = test_service();
        let (board, bob) = board_with_member(&svc, ROLE_VIEWER);

        let err = svc
            .update_member_role(
                9999,
                bob.id,
                UpdateMemberRole {
                    role: ROLE_VIEWER.into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));

        let err = svc
            .update_member_role(
                board.id,
                9999,
                UpdateMemberRole {
                    role: ROLE_VIEWER.into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));

        let err = svc
            .update_member_role(
                board.id,
                bob.id,
                UpdateMemberRole {
                    role: "archivist".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
    }
}
