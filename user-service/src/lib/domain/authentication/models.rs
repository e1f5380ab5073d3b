use auth::TokenPair;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

/// Credentials presented at login.
///
/// The email is kept raw: a malformed address is reported exactly like an
/// unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub role: Role,
    pub tokens: TokenPair,
}
