use serde::{Deserialize, Serialize};

/// A task board. The owner also holds an `owner` membership row, which is
/// what the role gate consults; `owner_id` records who created the board.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoard {
    pub name: String,
    pub description: Option<String>,
}

/// Explicit per-field merge payload. Unknown fields are rejected so a
/// stray key can never reach a protected column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBoard {
    pub name: Option<String>,
    pub description: Option<String>,
}
