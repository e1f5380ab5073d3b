use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;
use super::keys::KeyRing;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Uses HS256 (HMAC with SHA-256) and signs
/// with the active key of its `KeyRing`.
#[derive(Debug)]
pub struct JwtHandler {
    keys: KeyRing,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler over a key ring.
    ///
    /// # Security Notes
    /// - Secrets are loaded from configuration at startup, never from code
    /// - Rotate by promoting a new active key and retiring the old one
    pub fn new(keys: KeyRing) -> Self {
        Self {
            keys,
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Returns
    /// JWT token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.keys.active_key_id().to_string());

        encode(&header, claims, self.keys.encoding_key()?)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The signature must verify under the key named by the `kid` header (or
    /// the active key when absent) and `exp` must be present and not in the
    /// past. No leeway is applied.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Malformed` - Token structure, encoding or algorithm is invalid
    /// * `UnknownKey` - Token names a key that is not in the key ring
    /// * `InvalidSignature` - Signature does not verify
    /// * `TokenExpired` - Token has expired
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;
        let decoding_key = self.keys.decoding_key(header.kid.as_deref())?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data = decode::<T>(token, decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Malformed(e.to_string()),
        })?;

        Ok(token_data.claims)
    }
}
