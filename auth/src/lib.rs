//! Authentication utilities library
//!
//! Provides the authentication core of the user service:
//! - Password hashing (Argon2id)
//! - Session token issuance and validation (HS256 JWT, versioned keys)
//! - Authentication coordination
//!
//! The library performs no I/O. Services own their user storage and call in
//! through the `Authenticator`.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{KeyRing, TokenIssuer, JwtHandler, TokenLifetimes};
//!
//! let keys = KeyRing::new("v1", b"secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(JwtHandler::new(keys), TokenLifetimes::default());
//! let access = issuer.issue_access_token(42).unwrap();
//! let claims = issuer.validate(&access.token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, KeyRing, TokenLifetimes};
//!
//! let keys = KeyRing::new("v1", b"secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(keys, TokenLifetimes::default());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue tokens
//! let tokens = auth.authenticate("password123", &hash, 1).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&tokens.access_token).unwrap();
//! assert_eq!(claims.user_id, 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use jwt::AccessToken;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::KeyRing;
pub use jwt::TokenIssuer;
pub use jwt::TokenLifetimes;
pub use password::PasswordError;
pub use password::PasswordHasher;
