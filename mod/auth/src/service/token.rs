use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use password_hash::rand_core::{OsRng, RngCore};
use thiserror::Error;

use taskboard_sql::Value;

use crate::model::{AccessClaims, RefreshClaims, TokenPair, User};
use crate::service::{AuthError, AuthService};

/// Why a token failed to decode. The two kinds carry different
/// user-facing messages, so they stay distinct all the way up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Could not validate credentials")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

impl AuthService {
    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.config.jwt_secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.config.jwt_secret.as_bytes())
    }

    /// Exact-expiry validation: a token is dead at `exp`, not `exp` plus
    /// some leeway window.
    fn validation() -> Validation {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation
    }

    /// Mint an access token embedding the user's current permissions.
    pub fn issue_access(&self, user_id: i64, permissions: Vec<String>) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            permissions,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::seconds(self.config.access_token_ttl)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key())
            .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Mint a refresh token. Identity only — no permissions are embedded,
    /// so they are re-derived from the DB when the token is exchanged.
    pub fn issue_refresh(&self, user_id: i64) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: format!("{:016x}{:016x}", OsRng.next_u64(), OsRng.next_u64()),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::seconds(self.config.refresh_token_ttl)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key())
            .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Issue a full token pair for a user, flattening their global roles
    /// into the access claims.
    pub fn issue_tokens(&self, user: &User) -> Result<TokenPair, AuthError> {
        let permissions = self.permissions_for_user(user.id)?;
        Ok(TokenPair {
            access_token: self.issue_access(user.id, permissions)?,
            refresh_token: self.issue_refresh(user.id)?,
            token_type: "Bearer".to_string(),
        })
    }

    /// Decode and verify an access token.
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key(), &Self::validation())?;
        Self::check_expiry(data.claims.exp)?;
        Ok(data.claims)
    }

    /// Decode and verify a refresh token.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let data = decode::<RefreshClaims>(token, &self.decoding_key(), &Self::validation())?;
        Self::check_expiry(data.claims.exp)?;
        Ok(data.claims)
    }

    /// A token is dead the instant `now >= exp`. The library only rejects
    /// `exp < now`, so the boundary second needs its own check.
    fn check_expiry(exp: i64) -> Result<(), TokenError> {
        if exp <= chrono::Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(())
    }

    /// Exchange a refresh token for a new pair (rotation). The submitted
    /// token is recorded in the revocation ledger before the new pair is
    /// minted; of two concurrent exchanges of the same token, exactly one
    /// wins the ledger insert.
    pub fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .decode_refresh(refresh_token)
            .map_err(|e| AuthError::Unauthorized(e.to_string()))?;

        if self.is_revoked(refresh_token)? {
            return Err(AuthError::Unauthorized("Token has been revoked".into()));
        }

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::Unauthorized("Could not validate credentials".into()))?;
        let user = match self.get_user(user_id) {
            Ok(user) => user,
            // The subject no longer exists: the token is dead, not the DB.
            Err(AuthError::NotFound(_)) => {
                return Err(AuthError::Unauthorized(
                    "Could not validate credentials".into(),
                ))
            }
            Err(e) => return Err(e),
        };

        self.revoke_refresh_token(refresh_token, claims.exp)?;

        self.issue_tokens(&user)
    }

    /// Invalidate a refresh token. The matching access token stays valid
    /// until its own expiry — access tokens are stateless and never
    /// revocable in this design.
    pub fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self
            .decode_refresh(refresh_token)
            .map_err(|e| AuthError::Unauthorized(e.to_string()))?;

        if self.is_revoked(refresh_token)? {
            return Err(AuthError::Unauthorized("Token has been revoked".into()));
        }

        self.revoke_refresh_token(refresh_token, claims.exp)
    }

    /// True if the token is in the revocation ledger.
    pub fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT token FROM revoked_tokens WHERE token = ?1",
                &[Value::Text(token.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    /// Record a refresh token in the ledger. The UNIQUE token column makes
    /// this an atomic claim: a second writer gets Unauthorized.
    fn revoke_refresh_token(&self, token: &str, expires_at: i64) -> Result<(), AuthError> {
        self.sql
            .insert(
                "INSERT INTO revoked_tokens (token, expires_at) VALUES (?1, ?2)",
                &[Value::Text(token.to_string()), Value::Integer(expires_at)],
            )
            .map_err(|e| {
                if e.is_constraint() {
                    tracing::warn!("refresh token presented after revocation");
                    AuthError::Unauthorized("Token has been revoked".into())
                } else {
                    AuthError::Storage(e.to_string())
                }
            })?;
        Ok(())
    }

    /// Delete ledger entries whose token has expired anyway. Revoked
    /// entries are only meaningful while the token signature would still
    /// verify; past expiry the decode alone rejects it. Called explicitly
    /// by an operator or scheduled job, never automatically.
    pub fn prune_revoked_tokens(&self) -> Result<u64, AuthError> {
        let now = chrono::Utc::now().timestamp();
        self.sql
            .exec(
                "DELETE FROM revoked_tokens WHERE expires_at < ?1",
                &[Value::Integer(now)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}
