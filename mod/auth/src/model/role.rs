use serde::{Deserialize, Serialize};

/// Name of the global platform-administrator role.
pub const ROLE_ADMIN: &str = "admin";

/// Board-scoped role names. These carry no global permissions — they are
/// markers whose meaning is resolved against a board membership row.
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_CONTRIBUTOR: &str = "contributor";
pub const ROLE_VIEWER: &str = "viewer";

/// Permission strings granted by global roles and embedded in access
/// tokens at issuance.
pub mod permission {
    pub const VIEW_ALL_USERS: &str = "view_all_users";
    pub const CREATE_USER: &str = "create_user";
    pub const UPDATE_USER: &str = "update_user";
    pub const DELETE_USER: &str = "delete_user";
    pub const VIEW_ROLES: &str = "view_roles";
    pub const ASSIGN_ROLE: &str = "assign_role";
    pub const VIEW_ALL_BOARDS: &str = "view_all_boards";
}

/// The full permission list held by the `admin` role.
pub fn admin_permissions() -> Vec<&'static str> {
    vec![
        permission::VIEW_ALL_USERS,
        permission::CREATE_USER,
        permission::UPDATE_USER,
        permission::DELETE_USER,
        permission::VIEW_ROLES,
        permission::ASSIGN_ROLE,
        permission::VIEW_ALL_BOARDS,
    ]
}

/// A role definition. Identified by name (unique); the permission list is
/// flattened into the access token at issuance time only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Row id.
    pub id: i64,

    /// Unique name ("admin", "owner", "contributor", "viewer").
    pub name: String,

    /// Permission strings this role grants. Empty for board roles.
    #[serde(default)]
    pub permissions: Vec<String>,
}
