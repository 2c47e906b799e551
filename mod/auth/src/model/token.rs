use serde::{Deserialize, Serialize};

/// Claims payload of an access token.
///
/// The permission list is flattened from the user's global roles at
/// issuance. A role change therefore takes effect at the next login or
/// refresh, not mid-life — the freshness window is bounded by the access
/// token TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: user id, string-encoded integer.
    pub sub: String,

    /// Flat permission list derived from the user's global roles.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Claims payload of a refresh token. Carries identity only — claims are
/// re-derived from current DB state when the token is exchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject: user id, string-encoded integer.
    pub sub: String,

    /// Unique token id. `iat`/`exp` have second granularity, so without
    /// this two tokens minted in the same second would be byte-identical
    /// and the revocation ledger could not tell them apart.
    pub jti: String,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// The verified identity of a request, reconstructed per request from the
/// bearer token. Never persisted.
#[derive(Debug, Clone)]
pub struct Principal {
    /// User id.
    pub user_id: i64,

    /// Permissions embedded in the access token at issuance.
    pub permissions: Vec<String>,
}

impl Principal {
    /// True if every permission in `required` is held.
    pub fn has_permissions(&self, required: &[&str]) -> bool {
        required.iter().all(|p| self.permissions.iter().any(|h| h == p))
    }
}

/// Request body for token refresh and logout.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned after login or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}
