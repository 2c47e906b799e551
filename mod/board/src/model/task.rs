use serde::{Deserialize, Serialize};

/// Valid task workflow states.
pub const TASK_STATUSES: &[&str] = &["todo", "in_progress", "done"];

/// Valid task priorities.
pub const TASK_PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

/// A task. `board_id` is denormalized from the parent list so the role
/// gate never needs a second hop.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub list_id: i64,
    pub board_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub creator_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `todo`.
    pub status: Option<String>,
    /// Defaults to `medium`.
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}
