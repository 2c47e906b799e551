use serde::{Deserialize, Serialize};

/// A membership row: the ground truth for board-scoped access. One row
/// per (user, board); the role is a board-scoped role id.
#[derive(Debug, Clone, Serialize)]
pub struct BoardMember {
    pub user_id: i64,
    pub board_id: i64,
    pub role_id: i64,
}

/// A member as listed to clients, with the user and role joined in.
#[derive(Debug, Clone, Serialize)]
pub struct BoardMemberView {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Payload for changing a member's board role.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMemberRole {
    pub role: String,
}
