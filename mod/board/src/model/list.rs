use serde::{Deserialize, Serialize};

/// A list (column) on a board.
#[derive(Debug, Clone, Serialize)]
pub struct List {
    pub id: i64,
    pub board_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateList {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateList {
    pub name: Option<String>,
    pub description: Option<String>,
}
