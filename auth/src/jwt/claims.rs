use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token payload.
///
/// Access and refresh tokens share this structure; they differ only in the
/// lifetime used to compute `exp`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Numeric identifier of the authenticated user
    pub user_id: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims issued at `issued_at` and valid for `lifetime`.
    pub fn new(user_id: i64, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            user_id,
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// Create claims issued now and valid for `lifetime`.
    pub fn for_user(user_id: i64, lifetime: Duration) -> Self {
        Self::new(user_id, Utc::now(), lifetime)
    }

    /// Check if token is expired.
    ///
    /// A token is still valid during the second of its expiration.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
