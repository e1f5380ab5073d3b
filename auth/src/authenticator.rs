use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::KeyRing;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenLifetimes;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and session token handling.
#[derive(Debug)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

/// Access and refresh tokens issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Access token expiration (Unix timestamp)
    pub expires_at: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `keys` - Signing keys for session tokens
    /// * `lifetimes` - Access and refresh token lifetimes
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(keys: KeyRing, lifetimes: TokenLifetimes) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(JwtHandler::new(keys), lifetimes),
        }
    }

    /// Password hasher, for callers that move hashing off the async executor.
    pub fn password_hasher(&self) -> PasswordHasher {
        self.password_hasher
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.token_issuer.lifetimes()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed or input too long
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identity to bind the tokens to
    ///
    /// # Returns
    /// Access and refresh tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair(user_id)?)
    }

    /// Issue access and refresh tokens without password verification.
    ///
    /// Used by the refresh flow, where identity was already proven by a
    /// valid refresh token.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, user_id: i64) -> Result<TokenPair, JwtError> {
        let access = self.token_issuer.issue_access_token(user_id)?;
        let refresh_token = self.token_issuer.issue_refresh_token(user_id)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token,
            expires_at: access.expires_at,
        })
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged, signed with an unknown key or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_issuer.validate(token)
    }
}
