use auth::model::ROLE_VIEWER;
use taskboard_core::now_rfc3339;
use taskboard_sql::{Row, Statement, Value};

use crate::model::{Invitation, INVITATION_ACCEPTED, INVITATION_DECLINED, INVITATION_PENDING};
use crate::service::{BoardError, BoardService};

impl BoardService {
    /// Invite a user to a board. Creates a `pending` invitation; the
    /// partial UNIQUE index on (board, user) WHERE pending backs up the
    /// duplicate check against concurrent inviters.
    pub fn invite(
        &self,
        board_id: i64,
        invited_user_id: i64,
        inviter_user_id: i64,
    ) -> Result<Invitation, BoardError> {
        self.get_board(board_id)?;
        self.auth.get_user(invited_user_id)?;

        if self.get_member(invited_user_id, board_id)?.is_some() {
            return Err(BoardError::Conflict(
                "User is already a member of this board".into(),
            ));
        }
        if self
            .find_pending_invitation(board_id, invited_user_id)?
            .is_some()
        {
            return Err(BoardError::Conflict(
                "User already has a pending invitation to this board".into(),
            ));
        }

        let id = self
            .sql
            .insert(
                "INSERT INTO invitations
                 (board_id, invited_user_id, inviter_user_id, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                &[
                    Value::Integer(board_id),
                    Value::Integer(invited_user_id),
                    Value::Integer(inviter_user_id),
                    Value::Text(INVITATION_PENDING.to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(|e| {
                BoardError::storage(e, "User already has a pending invitation to this board")
            })?;

        self.get_invitation_for(id, invited_user_id)
    }

    /// Accept an invitation. Only the addressee can see it at all; the
    /// scoping lives in the lookup query so foreign invitations read as
    /// absent rather than forbidden.
    ///
    /// The status flip and the viewer membership insert commit as one
    /// transaction. The flip is guarded on `status = 'pending'`, so of two
    /// concurrent accepts exactly one commits both writes; the loser's
    /// membership insert hits the composite primary key and rolls back.
    pub fn accept_invitation(
        &self,
        invitation_id: i64,
        acting_user_id: i64,
    ) -> Result<Invitation, BoardError> {
        let invitation = self.get_invitation_for(invitation_id, acting_user_id)?;
        if invitation.status != INVITATION_PENDING {
            return Err(BoardError::Conflict(
                "Invitation is no longer pending".into(),
            ));
        }
        if self.get_member(acting_user_id, invitation.board_id)?.is_some() {
            return Err(BoardError::Conflict(
                "User is already a member of this board".into(),
            ));
        }

        let viewer = self.auth.get_role_by_name(ROLE_VIEWER)?;
        self.sql
            .exec_batch(&[
                Statement::new(
                    "UPDATE invitations SET status = ?1 WHERE id = ?2 AND status = ?3",
                    vec![
                        Value::Text(INVITATION_ACCEPTED.to_string()),
                        Value::Integer(invitation.id),
                        Value::Text(INVITATION_PENDING.to_string()),
                    ],
                ),
                Statement::new(
                    "INSERT INTO board_members (user_id, board_id, role_id) VALUES (?1, ?2, ?3)",
                    vec![
                        Value::Integer(acting_user_id),
                        Value::Integer(invitation.board_id),
                        Value::Integer(viewer.id),
                    ],
                ),
            ])
            .map_err(|e| {
                // The guard matched nothing: a concurrent decline (or
                // accept) settled the invitation between our read and the
                // batch. The membership insert rolled back with it.
                if e.is_no_effect() {
                    BoardError::Conflict("Invitation is no longer pending".into())
                } else {
                    BoardError::storage(e, "User is already a member of this board")
                }
            })?;

        tracing::debug!(
            invitation_id = invitation.id,
            board_id = invitation.board_id,
            user_id = acting_user_id,
            "invitation accepted"
        );

        self.get_invitation_for(invitation.id, acting_user_id)
    }

    /// Decline an invitation. Terminal; no membership side effect.
    pub fn decline_invitation(
        &self,
        invitation_id: i64,
        acting_user_id: i64,
    ) -> Result<Invitation, BoardError> {
        let invitation = self.get_invitation_for(invitation_id, acting_user_id)?;
        if invitation.status != INVITATION_PENDING {
            return Err(BoardError::Conflict(
                "Invitation is no longer pending".into(),
            ));
        }

        let affected = self.sql.exec(
            "UPDATE invitations SET status = ?1 WHERE id = ?2 AND status = ?3",
            &[
                Value::Text(INVITATION_DECLINED.to_string()),
                Value::Integer(invitation.id),
                Value::Text(INVITATION_PENDING.to_string()),
            ],
        )?;
        // Lost a race with a concurrent accept/decline since our read.
        if affected == 0 {
            return Err(BoardError::Conflict(
                "Invitation is no longer pending".into(),
            ));
        }

        self.get_invitation_for(invitation.id, acting_user_id)
    }

    /// Pending invitations addressed to a user.
    pub fn pending_invitations_for_user(&self, user_id: i64) -> Result<Vec<Invitation>, BoardError> {
        let rows = self.sql.query(
            "SELECT id, board_id, invited_user_id, inviter_user_id, status, created_at
             FROM invitations WHERE invited_user_id = ?1 AND status = ?2 ORDER BY id",
            &[
                Value::Integer(user_id),
                Value::Text(INVITATION_PENDING.to_string()),
            ],
        )?;
        rows.iter().map(invitation_from_row).collect()
    }

    /// Settled (accepted or declined) invitations addressed to a user.
    pub fn past_invitations_for_user(&self, user_id: i64) -> Result<Vec<Invitation>, BoardError> {
        let rows = self.sql.query(
            "SELECT id, board_id, invited_user_id, inviter_user_id, status, created_at
             FROM invitations WHERE invited_user_id = ?1 AND status != ?2 ORDER BY id",
            &[
                Value::Integer(user_id),
                Value::Text(INVITATION_PENDING.to_string()),
            ],
        )?;
        rows.iter().map(invitation_from_row).collect()
    }

    /// Addressee-scoped lookup. A wrong acting user gets NotFound, which
    /// keeps other users' invitations unobservable.
    fn get_invitation_for(&self, id: i64, acting_user_id: i64) -> Result<Invitation, BoardError> {
        let rows = self.sql.query(
            "SELECT id, board_id, invited_user_id, inviter_user_id, status, created_at
             FROM invitations WHERE id = ?1 AND invited_user_id = ?2",
            &[Value::Integer(id), Value::Integer(acting_user_id)],
        )?;
        match rows.first() {
            Some(row) => invitation_from_row(row),
            None => Err(BoardError::NotFound("Invitation does not exist".into())),
        }
    }

    fn find_pending_invitation(
        &self,
        board_id: i64,
        invited_user_id: i64,
    ) -> Result<Option<Invitation>, BoardError> {
        let rows = self.sql.query(
            "SELECT id, board_id, invited_user_id, inviter_user_id, status, created_at
             FROM invitations
             WHERE board_id = ?1 AND invited_user_id = ?2 AND status = ?3",
            &[
                Value::Integer(board_id),
                Value::Integer(invited_user_id),
                Value::Text(INVITATION_PENDING.to_string()),
            ],
        )?;
        rows.first().map(invitation_from_row).transpose()
    }
}

fn invitation_from_row(row: &Row) -> Result<Invitation, BoardError> {
    Ok(Invitation {
        id: row
            .get_i64("id")
            .ok_or_else(|| BoardError::Internal("missing id column".into()))?,
        board_id: row
            .get_i64("board_id")
            .ok_or_else(|| BoardError::Internal("missing board_id column".into()))?,
        invited_user_id: row
            .get_i64("invited_user_id")
            .ok_or_else(|| BoardError::Internal("missing invited_user_id column".into()))?,
        inviter_user_id: row
            .get_i64("inviter_user_id")
            .ok_or_else(|| BoardError::Internal("missing inviter_user_id column".into()))?,
        status: row
            .get_str("status")
            .ok_or_else(|| BoardError::Internal("missing status column".into()))?
            .to_string(),
        created_at: row
            .get_str("created_at")
            .ok_or_else(|| BoardError::Internal("missing created_at column".into()))?
            .to_string(),
    })
}
