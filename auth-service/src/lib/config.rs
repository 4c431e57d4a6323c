use std::env;

use auth::TokenConfig;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenSettings,
    pub session: SessionConfig,
    #[serde(default)]
    pub password: PasswordConfig,
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
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

/// Token signing settings as they appear in configuration.
#[derive(Deserialize, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_hours: i64,
}

// Keeps the signing secret out of logs.
impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_hours: i64,
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for Argon2id)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_cleanup_interval_seconds() -> u64 {
    3600
}

impl TokenSettings {
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_ttl_minutes)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::hours(self.refresh_ttl_hours)
    }

    pub fn to_token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.secret.clone(),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            access_ttl: self.access_ttl(),
            refresh_ttl: self.refresh_ttl(),
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::hours(self.ttl_hours)
    }

    pub fn cleanup_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cleanup_interval_seconds)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, TOKEN__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_environment(Environment::default().separator("__"))
    }

    /// Load configuration with an explicit environment source.
    ///
    /// # Arguments
    /// * `environment` - Overrides applied on top of the config files, e.g.
    ///   `TOKEN__SECRET=...` overrides `token.secret`
    pub fn load_with_environment(environment: Environment) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check cross-field invariants the individual sections cannot express.
    ///
    /// Access tokens must expire strictly before refresh tokens, and a
    /// refresh token must not outlive the session it rotates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.secret.is_empty() {
            return Err(ConfigError::Message("token.secret must be set".to_string()));
        }

        if self.token.access_ttl() <= Duration::zero() {
            return Err(ConfigError::Message(
                "token.access_ttl_minutes must be positive".to_string(),
            ));
        }

        if self.token.access_ttl() >= self.token.refresh_ttl() {
            return Err(ConfigError::Message(
                "token.access_ttl_minutes must be shorter than token.refresh_ttl_hours"
                    .to_string(),
            ));
        }

        if self.token.refresh_ttl() > self.session.ttl() {
            return Err(ConfigError::Message(
                "token.refresh_ttl_hours must not exceed session.ttl_hours".to_string(),
            ));
        }

        if self.session.cleanup_interval_seconds == 0 {
            return Err(ConfigError::Message(
                "session.cleanup_interval_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/auth".to_string(),
                max_connections: 5,
            },
            server: ServerConfig {
                http_port: 8080,
                request_timeout_seconds: 10,
            },
            token: TokenSettings {
                secret: "s3cret".to_string(),
                issuer: "app".to_string(),
                audience: "app-users".to_string(),
                access_ttl_minutes: 15,
                refresh_ttl_hours: 720,
            },
            session: SessionConfig {
                ttl_hours: 720,
                cleanup_interval_seconds: 3600,
            },
            password: PasswordConfig::default(),
        }
    }

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::default().separator("__").source(Some(vars))
    }

    #[test]
    fn test_environment_overrides_token_secret() {
        let config = Config::load_with_environment(environment(&[
            ("TOKEN__SECRET", "from-env-secret"),
            ("DATABASE__URL", "postgresql://db.internal/auth"),
        ]))
        .unwrap();

        assert_eq!(config.token.secret, "from-env-secret");
        assert_eq!(config.database.url, "postgresql://db.internal/auth");
        assert_eq!(config.token.issuer, "app");
    }

    #[test]
    fn test_files_apply_without_overrides() {
        let config = Config::load_with_environment(environment(&[])).unwrap();
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.session.ttl_hours, 720);
    }

    #[test]
    fn test_default_ttls_are_ordered() {
        let config = config();
        assert!(config.validate().is_ok());
        assert!(config.token.access_ttl() < config.token.refresh_ttl());
        assert!(config.token.refresh_ttl() <= config.session.ttl());
    }

    #[test]
    fn test_refresh_longer_than_session_rejected() {
        let mut config = config();
        config.session.ttl_hours = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_access_not_shorter_than_refresh_rejected() {
        let mut config = config();
        config.token.access_ttl_minutes = 720 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_secret_rejected() {
        let mut config = config();
        config.token.secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_settings_debug_redacts_secret() {
        assert!(!format!("{:?}", config().token).contains("s3cret"));
    }

    #[test]
    fn test_to_token_config() {
        let token_config = config().token.to_token_config();
        assert_eq!(token_config.access_ttl, Duration::minutes(15));
        assert_eq!(token_config.refresh_ttl, Duration::hours(720));
        assert_eq!(token_config.issuer, "app");
    }
}
