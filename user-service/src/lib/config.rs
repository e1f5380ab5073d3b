use std::collections::HashMap;
use std::env;

use auth::JwtError;
use auth::KeyRing;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub grpc_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// Identifier of the key new tokens are signed with
    #[serde(default = "default_key_id")]
    pub key_id: String,
    pub secret: String,
    /// Keys still accepted for validation, by key id
    #[serde(default)]
    pub retired_keys: HashMap<String, String>,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_key_id() -> String {
    "default".to_string()
}

fn default_access_token_ttl_secs() -> i64 {
    15 * 60
}

fn default_refresh_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

impl JwtConfig {
    /// Build the signing key ring: the active key plus every retired key.
    ///
    /// # Errors
    /// * `WeakSecret` - A secret is shorter than the minimum length
    /// * `DuplicateKey` - A retired key reuses an existing key id
    pub fn key_ring(&self) -> Result<KeyRing, JwtError> {
        self.retired_keys.iter().try_fold(
            KeyRing::new(self.key_id.clone(), self.secret.as_bytes())?,
            |keys, (key_id, secret)| keys.with_retired_key(key_id.clone(), secret.as_bytes()),
        )
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: chrono::Duration::seconds(self.access_token_ttl_secs),
            refresh: chrono::Duration::seconds(self.refresh_token_ttl_secs),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("key_id", &self.key_id)
            .field("retired_keys", &self.retired_keys.keys().collect::<Vec<_>>())
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::layered(&run_mode, environment())
    }

    fn layered(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

/// Unprefixed variables with `__` between sections and keys.
///
/// Example: CORS__ALLOWED_ORIGINS=http://a.com,http://b.com
fn environment() -> Environment {
    Environment::default()
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}
