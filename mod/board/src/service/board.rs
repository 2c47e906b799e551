use auth::model::ROLE_OWNER;
use taskboard_core::{now_rfc3339, ListParams, ListResult};
use taskboard_sql::{Row, Value};

use crate::model::{Board, CreateBoard, UpdateBoard};
use crate::service::{BoardError, BoardService};

impl BoardService {
    /// Create a board. The creator gets an `owner` membership row; the
    /// role gate consults that row, not `owner_id`.
    pub fn create_board(&self, creator_id: i64, input: CreateBoard) -> Result<Board, BoardError> {
        if input.name.trim().is_empty() {
            return Err(BoardError::Validation("Board name must not be empty".into()));
        }

        let owner_role = self.auth.get_role_by_name(ROLE_OWNER)?;

        let board_id = self.sql.insert(
            "INSERT INTO boards (name, description, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            &[
                Value::Text(input.name.clone()),
                match &input.description {
                    Some(d) => Value::Text(d.clone()),
                    None => Value::Null,
                },
                Value::Integer(creator_id),
                Value::Text(now_rfc3339()),
            ],
        )?;

        // The owner membership must exist for the board to be usable. If
        // this insert fails, take the orphaned board back out.
        let membership = self.sql.insert(
            "INSERT INTO board_members (user_id, board_id, role_id) VALUES (?1, ?2, ?3)",
            &[
                Value::Integer(creator_id),
                Value::Integer(board_id),
                Value::Integer(owner_role.id),
            ],
        );
        if let Err(e) = membership {
            let _ = self
                .sql
                .exec("DELETE FROM boards WHERE id = ?1", &[Value::Integer(board_id)]);
            return Err(BoardError::Storage(e.to_string()));
        }

        tracing::debug!(board_id, owner_id = creator_id, "created board");

        self.get_board(board_id)
    }

    pub fn get_board(&self, id: i64) -> Result<Board, BoardError> {
        let rows = self.sql.query(
            "SELECT id, name, description, owner_id, created_at FROM boards WHERE id = ?1",
            &[Value::Integer(id)],
        )?;
        match rows.first() {
            Some(row) => board_from_row(row),
            None => Err(BoardError::NotFound("Board does not exist".into())),
        }
    }

    /// List every board on the platform. Admin-only at the API layer.
    pub fn list_all_boards(&self, params: &ListParams) -> Result<ListResult<Board>, BoardError> {
        let total = self
            .sql
            .query("SELECT COUNT(*) AS n FROM boards", &[])?
            .first()
            .and_then(|r| r.get_i64("n"))
            .unwrap_or(0) as usize;

        let rows = self.sql.query(
            "SELECT id, name, description, owner_id, created_at FROM boards
             ORDER BY id LIMIT ?1 OFFSET ?2",
            &[
                Value::Integer(params.limit as i64),
                Value::Integer(params.offset as i64),
            ],
        )?;
        let items = rows.iter().map(board_from_row).collect::<Result<_, _>>()?;
        Ok(ListResult { items, total })
    }

    /// Boards the user is a member of, with any role.
    pub fn boards_for_user(&self, user_id: i64) -> Result<Vec<Board>, BoardError> {
        let rows = self.sql.query(
            "SELECT b.id, b.name, b.description, b.owner_id, b.created_at
             FROM boards b
             JOIN board_members m ON m.board_id = b.id
             WHERE m.user_id = ?1
             ORDER BY b.id",
            &[Value::Integer(user_id)],
        )?;
        rows.iter().map(board_from_row).collect()
    }

    /// Update name/description. Ownership and membership are never
    /// touched through this path.
    pub fn update_board(&self, id: i64, update: UpdateBoard) -> Result<Board, BoardError> {
        let board = self.get_board(id)?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(BoardError::Validation("Board name must not be empty".into()));
            }
            self.sql.exec(
                "UPDATE boards SET name = ?1 WHERE id = ?2",
                &[Value::Text(name), Value::Integer(board.id)],
            )?;
        }
        if let Some(description) = update.description {
            self.sql.exec(
                "UPDATE boards SET description = ?1 WHERE id = ?2",
                &[Value::Text(description), Value::Integer(board.id)],
            )?;
        }

        self.get_board(board.id)
    }

    /// Delete a board. Memberships, invitations, lists and tasks cascade.
    pub fn delete_board(&self, id: i64) -> Result<(), BoardError> {
        let affected = self
            .sql
            .exec("DELETE FROM boards WHERE id = ?1", &[Value::Integer(id)])?;
        if affected == 0 {
            return Err(BoardError::NotFound("Board does not exist".into()));
        }
        Ok(())
    }
}

pub(crate) fn board_from_row(row: &Row) -> Result<Board, BoardError> {
    Ok(Board {
        id: row
            .get_i64("id")
            .ok_or_else(|| BoardError::Internal("missing id column".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| BoardError::Internal("missing name column".into()))?
            .to_string(),
        description: row.get_str("description").map(|s| s.to_string()),
        owner_id: row
            .get_i64("owner_id")
            .ok_or_else(|| BoardError::Internal("missing owner_id column".into()))?,
        created_at: row
            .get_str("created_at")
            .ok_or_else(|| BoardError::Internal("missing created_at column".into()))?
            .to_string(),
    })
}
