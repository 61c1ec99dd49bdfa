use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Database URL that selects the process-local user store.
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Longest token lifetime accepted: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 365 * 24;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_environment")]
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_lookup_timeout_ms() -> u64 {
    5_000
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| default_environment());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .set_override("environment", run_mode)?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Empty signing secret, token TTL outside
    ///   `1..=MAX_TOKEN_TTL_HOURS` or zero timeouts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.jwt.token_ttl_hours <= 0 || self.jwt.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS, self.jwt.token_ttl_hours
            )));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "server.request_timeout_secs must be positive".into(),
            ));
        }
        if self.auth.lookup_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "auth.lookup_timeout_ms must be positive".into(),
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database.url == MEMORY_DATABASE_URL
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.token_ttl_hours)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.auth.lookup_timeout_ms)
    }
}
