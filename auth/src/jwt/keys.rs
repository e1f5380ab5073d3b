use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::JwtError;

/// Shortest accepted HMAC secret (256 bits for HS256).
pub const MIN_SECRET_BYTES: usize = 32;

struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Versioned set of symmetric signing keys.
///
/// Exactly one key is active and signs new tokens; its id is written to the
/// token header (`kid`). Retired keys are only used to verify tokens that
/// were signed before a rotation, until those tokens expire naturally.
///
/// Rotation: add the new key as active, move the previous active key to the
/// retired list, and drop it once the longest token lifetime has passed.
pub struct KeyRing {
    active_id: String,
    keys: HashMap<String, SigningKey>,
}

impl KeyRing {
    /// Create a key ring with a single active key.
    ///
    /// # Errors
    /// * `WeakSecret` - Secret is shorter than `MIN_SECRET_BYTES`
    pub fn new(key_id: impl Into<String>, secret: &[u8]) -> Result<Self, JwtError> {
        let active_id = key_id.into();
        let mut keys = HashMap::new();
        keys.insert(active_id.clone(), SigningKey::from_secret(secret)?);

        Ok(Self { active_id, keys })
    }

    /// Register a retired key that is still accepted for verification.
    ///
    /// # Errors
    /// * `WeakSecret` - Secret is shorter than `MIN_SECRET_BYTES`
    /// * `DuplicateKey` - A key with this id is already registered
    pub fn with_retired_key(
        mut self,
        key_id: impl Into<String>,
        secret: &[u8],
    ) -> Result<Self, JwtError> {
        let key_id = key_id.into();
        if self.keys.contains_key(&key_id) {
            return Err(JwtError::DuplicateKey(key_id));
        }

        self.keys.insert(key_id, SigningKey::from_secret(secret)?);
        Ok(self)
    }

    /// Identifier of the key used to sign new tokens.
    pub fn active_key_id(&self) -> &str {
        &self.active_id
    }

    pub(crate) fn encoding_key(&self) -> Result<&EncodingKey, JwtError> {
        self.keys
            .get(&self.active_id)
            .map(|key| &key.encoding)
            .ok_or_else(|| JwtError::UnknownKey(self.active_id.clone()))
    }

    /// Tokens without a `kid` header are checked against the active key.
    pub(crate) fn decoding_key(&self, key_id: Option<&str>) -> Result<&DecodingKey, JwtError> {
        let key_id = key_id.unwrap_or(&self.active_id);

        self.keys
            .get(key_id)
            .map(|key| &key.decoding)
            .ok_or_else(|| JwtError::UnknownKey(key_id.to_string()))
    }
}

impl SigningKey {
    fn from_secret(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(JwtError::WeakSecret {
                min: MIN_SECRET_BYTES,
                actual: secret.len(),
            });
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut key_ids: Vec<&String> = self.keys.keys().collect();
        key_ids.sort();

        f.debug_struct("KeyRing")
            .field("active_id", &self.active_id)
            .field("key_ids", &key_ids)
            .finish()
    }
}
