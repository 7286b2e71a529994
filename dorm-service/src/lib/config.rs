use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Transport flags for the session cookie.
#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    /// Domain attribute; host-only cookie when absent
    #[serde(default)]
    pub domain: Option<String>,
    /// Secure attribute, must be on in production
    #[serde(default = "default_secure")]
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSitePolicy,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    #[default]
    Lax,
    Strict,
}

/// First administrator, created at startup when no admin account exists yet.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

fn default_secure() -> bool {
    true
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            domain: None,
            secure: default_secure(),
            same_site: SameSitePolicy::default(),
        }
    }
}

impl SessionConfig {
    pub const MIN_SECRET_BYTES: usize = 32;
    pub const MAX_EXPIRATION_HOURS: i64 = 24 * 30;

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < Self::MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "session.secret must be at least {} bytes, got {}",
                Self::MIN_SECRET_BYTES,
                self.secret.len()
            )));
        }

        if !(1..=Self::MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "session.expiration_hours must be between 1 and {}, got {}",
                Self::MAX_EXPIRATION_HOURS,
                self.expiration_hours
            )));
        }

        Ok(())
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DORM__SESSION__SECRET, DORM__COOKIE__SECURE, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_for(&run_mode)
    }

    /// Load configuration for an explicit run mode.
    ///
    /// Only the development file carries a signing secret, so any other mode
    /// fails here unless `DORM__SESSION__SECRET` is set.
    pub fn load_for(run_mode: &str) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("DORM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(secret: &str, expiration_hours: i64) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/dorm".to_string(),
            },
            server: ServerConfig { http_port: 3000 },
            session: SessionConfig {
                secret: secret.to_string(),
                expiration_hours,
            },
            cookie: CookieConfig::default(),
            bootstrap: None,
        }
    }

    #[test]
    fn test_accepts_sane_session_settings() {
        let config = config_with("0123456789abcdef0123456789abcdef", 24);
        assert!(config.validate().is_ok());
        assert_eq!(config.session.ttl(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_rejects_short_secret() {
        let config = config_with("too-short", 24);
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("at least 32 bytes"));
    }

    #[test]
    fn test_rejects_out_of_range_expiration() {
        let secret = "0123456789abcdef0123456789abcdef";
        assert!(config_with(secret, 0).validate().is_err());
        assert!(config_with(secret, 24 * 31).validate().is_err());
        assert!(config_with(secret, 24 * 30).validate().is_ok());
    }

    #[test]
    fn test_production_requires_secret_from_environment() {
        if env::var("DORM__SESSION__SECRET").is_ok() {
            return;
        }

        let error = Config::load_for("production").unwrap_err();
        assert!(error.to_string().contains("secret"));
    }

    #[test]
    fn test_development_loads_local_secret() {
        if env::var("DORM__SESSION__SECRET").is_ok() {
            return;
        }

        let config = Config::load_for("development").unwrap();
        assert!(config.session.secret.len() >= SessionConfig::MIN_SECRET_BYTES);
        assert!(!config.cookie.secure);
        assert!(config.bootstrap.is_some());
    }

    #[test]
    fn test_cookie_defaults_are_secure() {
        let cookie = CookieConfig::default();
        assert!(cookie.secure);
        assert_eq!(cookie.domain, None);
        assert_eq!(cookie.same_site, SameSitePolicy::Lax);
    }
}
