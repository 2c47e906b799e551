use taskboard_core::now_rfc3339;
use taskboard_sql::{Row, Value};

use crate::model::{CreateTask, Task, UpdateTask, TASK_PRIORITIES, TASK_STATUSES};
use crate::service::{BoardError, BoardService};

impl BoardService {
    /// Create a task in a list. The board id is denormalized from the
    /// list at creation; a task never moves between boards.
    pub fn create_task(
        &self,
        list_id: i64,
        creator_id: i64,
        input: CreateTask,
    ) -> Result<Task, BoardError> {
        let board_id = self.board_id_of_list(list_id)?;
        if input.title.trim().is_empty() {
            return Err(BoardError::Validation("Task title must not be empty".into()));
        }

        let status = input.status.unwrap_or_else(|| "todo".to_string());
        let priority = input.priority.unwrap_or_else(|| "medium".to_string());
        validate_status(&status)?;
        validate_priority(&priority)?;

        let id = self.sql.insert(
            "INSERT INTO tasks
             (list_id, board_id, title, description, status, priority, due_date, creator_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            &[
                Value::Integer(list_id),
                Value::Integer(board_id),
                Value::Text(input.title),
                match input.description {
                    Some(d) => Value::Text(d),
                    None => Value::Null,
                },
                Value::Text(status),
                Value::Text(priority),
                match input.due_date {
                    Some(d) => Value::Text(d),
                    None => Value::Null,
                },
                Value::Integer(creator_id),
                Value::Text(now_rfc3339()),
            ],
        )?;
        self.get_task(id)
    }

    pub fn get_task(&self, id: i64) -> Result<Task, BoardError> {
        let rows = self.sql.query(
            "SELECT id, list_id, board_id, title, description, status, priority,
                    due_date, creator_id, created_at
             FROM tasks WHERE id = ?1",
            &[Value::Integer(id)],
        )?;
        match rows.first() {
            Some(row) => task_from_row(row),
            None => Err(BoardError::NotFound("Task does not exist".into())),
        }
    }

    pub fn tasks_for_list(&self, list_id: i64) -> Result<Vec<Task>, BoardError> {
        self.get_list(list_id)?;
        let rows = self.sql.query(
            "SELECT id, list_id, board_id, title, description, status, priority,
                    due_date, creator_id, created_at
             FROM tasks WHERE list_id = ?1 ORDER BY id",
            &[Value::Integer(list_id)],
        )?;
        rows.iter().map(task_from_row).collect()
    }

    /// All tasks on a board, across its lists. Served by the denormalized
    /// board_id column, no join through lists.
    pub fn tasks_for_board(&self, board_id: i64) -> Result<Vec<Task>, BoardError> {
        self.get_board(board_id)?;
        let rows = self.sql.query(
            "SELECT id, list_id, board_id, title, description, status, priority,
                    due_date, creator_id, created_at
             FROM tasks WHERE board_id = ?1 ORDER BY id",
            &[Value::Integer(board_id)],
        )?;
        rows.iter().map(task_from_row).collect()
    }

    pub fn update_task(&self, id: i64, update: UpdateTask) -> Result<Task, BoardError> {
        let task = self.get_task(id)?;

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(BoardError::Validation("Task title must not be empty".into()));
            }
            self.sql.exec(
                "UPDATE tasks SET title = ?1 WHERE id = ?2",
                &[Value::Text(title), Value::Integer(task.id)],
            )?;
        }
        if let Some(description) = update.description {
            self.sql.exec(
                "UPDATE tasks SET description = ?1 WHERE id = ?2",
                &[Value::Text(description), Value::Integer(task.id)],
            )?;
        }
        if let Some(status) = update.status {
            validate_status(&status)?;
            self.sql.exec(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                &[Value::Text(status), Value::Integer(task.id)],
            )?;
        }
        if let Some(priority) = update.priority {
            validate_priority(&priority)?;
            self.sql.exec(
                "UPDATE tasks SET priority = ?1 WHERE id = ?2",
                &[Value::Text(priority), Value::Integer(task.id)],
            )?;
        }
        if let Some(due_date) = update.due_date {
            self.sql.exec(
                "UPDATE tasks SET due_date = ?1 WHERE id = ?2",
                &[Value::Text(due_date), Value::Integer(task.id)],
            )?;
        }

        self.get_task(task.id)
    }

    pub fn delete_task(&self, id: i64) -> Result<(), BoardError> {
        let affected = self
            .sql
            .exec("DELETE FROM tasks WHERE id = ?1", &[Value::Integer(id)])?;
        if affected == 0 {
            return Err(BoardError::NotFound("Task does not exist".into()));
        }
        Ok(())
    }
}

fn validate_status(status: &str) -> Result<(), BoardError> {
    if TASK_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(BoardError::Validation(format!(
            "Invalid task status: {}",
            status
        )))
    }
}

fn validate_priority(priority: &str) -> Result<(), BoardError> {
    if TASK_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(BoardError::Validation(format!(
            "Invalid task priority: {}",
            priority
        )))
    }
}

fn task_from_row(row: &Row) -> Result<Task, BoardError> {
    Ok(Task {
        id: row
            .get_i64("id")
            .ok_or_else(|| BoardError::Internal("missing id column".into()))?,
        list_id: row
            .get_i64("list_id")
            .ok_or_else(|| BoardError::Internal("missing list_id column".into()))?,
        board_id: row
            .get_i64("board_id")
            .ok_or_else(|| BoardError::Internal("missing board_id column".into()))?,
        title: row
            .get_str("title")
            .ok_or_else(|| BoardError::Internal("missing title column".into()))?
            .to_string(),
        description: row.get_str("description").map(|s| s.to_string()),
        status: row
            .get_str("status")
            .ok_or_else(|| BoardError::Internal("missing status column".into()))?
            .to_string(),
        priority: row
            .get_str("priority")
            .ok_or_else(|| BoardError::Internal("missing priority column".into()))?
            .to_string(),
        due_date: row.get_str("due_date").map(|s| s.to_string()),
        creator_id: row
            .get_i64("creator_id")
            .ok_or_else(|| BoardError::Internal("missing creator_id column".into()))?,
        created_at: row
            .get_str("created_at")
            .ok_or_else(|| BoardError::Internal("missing created_at column".into()))?
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreateBoard, CreateList};
    use crate::service::tests::{register_user, test_service};

    fn setup() -> (
        std::sync::Arc<BoardService>,
        auth::model::User,
        crate::model::List,
    ) {
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
        let list = svc
            .create_list(
                board.id,
                CreateList {
                    name: "Todo".into(),
                    description: None,
                },
            )
            .unwrap();
        (svc, alice, list)
    }

    #[test]
    fn test_create_task_defaults_and_denormalized_board() {
        let (svc, alice, list) = setup();

        let task = svc
            .create_task(
                list.id,
                alice.id,
                CreateTask {
                    title: "Write docs".into(),
                    description: None,
                    status: None,
                    priority: None,
                    due_date: None,
                },
            )
            .unwrap();
        assert_eq!(task.status, "todo");
        assert_eq!(task.priority, "medium");
        assert_eq!(task.board_id, list.board_id);
        assert_eq!(task.creator_id, alice.id);
        assert_eq!(svc.board_id_of_task(task.id).unwrap(), list.board_id);
    }

    #[test]
    fn test_create_task_rejects_invalid_workflow_values() {
        let (svc, alice, list) = setup();

        let err = svc
            .create_task(
                list.id,
                alice.id,
                CreateTask {
                    title: "Bad".into(),
                    description: None,
                    status: Some("blocked".into()),
                    priority: None,
                    due_date: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));

        let err = svc
            .create_task(
                list.id,
                alice.id,
                CreateTask {
                    title: "Bad".into(),
                    description: None,
                    status: None,
                    priority: Some("urgent".into()),
                    due_date: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
    }

    #[test]
    fn test_tasks_for_board_spans_lists() {
        let (svc, alice, list) = setup();
        let other = svc
            .create_list(
                list.board_id,
                CreateList {
                    name: "Doing".into(),
                    description: None,
                },
            )
            .unwrap();
        for (list_id, title) in [(list.id, "First"), (other.id, "Second")] {
            svc.create_task(
                list_id,
                alice.id,
                CreateTask {
                    title: title.into(),
                    description: None,
                    status: None,
                    priority: None,
                    due_date: None,
                },
            )
            .unwrap();
        }

        let tasks = svc.tasks_for_board(list.board_id).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.board_id == list.board_id));
        // Per-list listings stay scoped.
        assert_eq!(svc.tasks_for_list(list.id).unwrap().len(), 1);

        assert!(matches!(
            svc.tasks_for_board(9999).unwrap_err(),
            BoardError::NotFound(_)
        ));
    }

    #[test]
    fn test_update_task_moves_through_workflow() {
        let (svc, alice, list) = setup();
        let task = svc
            .create_task(
                list.id,
                alice.id,
                CreateTask {
                    title: "Write docs".into(),
                    description: None,
                    status: None,
                    priority: None,
                    due_date: None,
                },
            )
            .unwrap();

        let updated = svc
            .update_task(
                task.id,
                UpdateTask {
                    status: Some("in_progress".into()),
                    priority: Some("high".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, "in_progress");
        assert_eq!(updated.priority, "high");
        assert_eq!(updated.title, "Write docs");
    }

    #[test]
    fn test_delete_list_cascades_tasks() {
        let (svc, alice, list) = setup();
        let task = svc
            .create_task(
                list.id,
                alice.id,
                CreateTask {
                    title: "Write docs".into(),
                    description: None,
                    status: None,
                    priority: None,
                    due_date: None,
                },
            )
            .unwrap();

        svc.delete_list(list.id).unwrap();
        assert!(matches!(
            svc.get_task(task.id).unwrap_err(),
            BoardError::NotFound(_)
        ));
    }
}
