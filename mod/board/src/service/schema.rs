use taskboard_sql::SQLStore;

use crate::service::BoardError;

/// Initialize the schema for board resources. Assumes the auth schema
/// (users, roles) already exists: foreign keys reference both.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), BoardError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS boards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            owner_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
        )",

        // Membership: the ground truth for board-scoped access. The
        // composite key keeps one row per (user, board) regardless of role.
        "CREATE TABLE IF NOT EXISTS board_members (
            user_id INTEGER NOT NULL,
            board_id INTEGER NOT NULL,
            role_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, board_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (board_id) REFERENCES boards(id) ON DELETE CASCADE,
            FOREIGN KEY (role_id) REFERENCES roles(id)
        )",

        "CREATE TABLE IF NOT EXISTS invitations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL,
            invited_user_id INTEGER NOT NULL,
            inviter_user_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            FOREIGN KEY (board_id) REFERENCES boards(id) ON DELETE CASCADE,
            FOREIGN KEY (invited_user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (inviter_user_id) REFERENCES users(id) ON DELETE CASCADE
        )",
        // At most one pending invitation per (board, user). Terminal
        // invitations are history and may accumulate freely.
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_invitations_pending
            ON invitations(board_id, invited_user_id) WHERE status = 'pending'",

        "CREATE TABLE IF NOT EXISTS lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (board_id) REFERENCES boards(id) ON DELETE CASCADE
        )",

        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL,
            board_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'todo',
            priority TEXT NOT NULL DEFAULT 'medium',
            due_date TEXT,
            creator_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (list_id) REFERENCES lists(id) ON DELETE CASCADE,
            FOREIGN KEY (board_id) REFERENCES boards(id) ON DELETE CASCADE,
            FOREIGN KEY (creator_id) REFERENCES users(id) ON DELETE CASCADE
        )",
        "CREATE INDEX IF NOT EXISTS idx_tasks_list ON tasks(list_id)",
        "CREATE INDEX IF NOT EXISTS idx_lists_board ON lists(board_id)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| BoardError::Storage(e.to_string()))?;
    }

    Ok(())
}
