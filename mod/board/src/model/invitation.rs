use serde::{Deserialize, Serialize};

/// Invitation states. `pending` is the only state that admits a
/// transition; `accepted` and `declined` are terminal.
pub const INVITATION_PENDING: &str = "pending";
pub const INVITATION_ACCEPTED: &str = "accepted";
pub const INVITATION_DECLINED: &str = "declined";

#[derive(Debug, Clone, Serialize)]
pub struct Invitation {
    pub id: i64,
    pub board_id: i64,
    pub invited_user_id: i64,
    pub inviter_user_id: i64,
    pub status: String,
    pub created_at: String,
}

/// Payload for inviting a user to a board.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InviteRequest {
    pub user_id: i64,
}
