use taskboard_core::now_rfc3339;
use taskboard_sql::{Row, Value};

use crate::model::{CreateList, List, UpdateList};
use crate::service::{BoardError, BoardService};

impl BoardService {
    pub fn create_list(&self, board_id: i64, input: CreateList) -> Result<List, BoardError> {
        self.get_board(board_id)?;
        if input.name.trim().is_empty() {
            return Err(BoardError::Validation("List name must not be empty".into()));
        }

        let id = self.sql.insert(
            "INSERT INTO lists (board_id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            &[
                Value::Integer(board_id),
                Value::Text(input.name),
                match input.description {
                    Some(d) => Value::Text(d),
                    None => Value::Null,
                },
                Value::Text(now_rfc3339()),
            ],
        )?;
        self.get_list(id)
    }

    pub fn get_list(&self, id: i64) -> Result<List, BoardError> {
        let rows = self.sql.query(
            "SELECT id, board_id, name, description, created_at FROM lists WHERE id = ?1",
            &[Value::Integer(id)],
        )?;
        match rows.first() {
            Some(row) => list_from_row(row),
            None => Err(BoardError::NotFound("List does not exist".into())),
        }
    }

    pub fn lists_for_board(&self, board_id: i64) -> Result<Vec<List>, BoardError> {
        self.get_board(board_id)?;
        let rows = self.sql.query(
            "SELECT id, board_id, name, description, created_at FROM lists
             WHERE board_id = ?1 ORDER BY id",
            &[Value::Integer(board_id)],
        )?;
        rows.iter().map(list_from_row).collect()
    }

    pub fn update_list(&self, id: i64, update: UpdateList) -> Result<List, BoardError> {
        let list = self.get_list(id)?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(BoardError::Validation("List name must not be empty".into()));
            }
            self.sql.exec(
                "UPDATE lists SET name = ?1 WHERE id = ?2",
                &[Value::Text(name), Value::Integer(list.id)],
            )?;
        }
        if let Some(description) = update.description {
            self.sql.exec(
                "UPDATE lists SET description = ?1 WHERE id = ?2",
                &[Value::Text(description), Value::Integer(list.id)],
            )?;
        }

        self.get_list(list.id)
    }

    /// Delete a list; its tasks cascade.
    pub fn delete_list(&self, id: i64) -> Result<(), BoardError> {
        let affected = self
            .sql
            .exec("DELETE FROM lists WHERE id = ?1", &[Value::Integer(id)])?;
        if affected == 0 {
            return Err(BoardError::NotFound("List does not exist".into()));
        }
        Ok(())
    }
}

fn list_from_row(row: &Row) -> Result<List, BoardError> {
    Ok(List {
        id: row
            .get_i64("id")
            .ok_or_else(|| BoardError::Internal("missing id column".into()))?,
        board_id: row
            .get_i64("board_id")
            .ok_or_else(|| BoardError::Internal("missing board_id column".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| BoardError::Internal("missing name column".into()))?
            .to_string(),
        description: row.get_str("description").map(|s| s.to_string()),
        created_at: row
            .get_str("created_at")
            .ok_or_else(|| BoardError::Internal("missing created_at column".into()))?
            .to_string(),
    })
}
