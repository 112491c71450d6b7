// ============================
// chirpy-backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML config file,
//! then `CHIRPY_` environment variables with `__` separating nested keys
//! (`CHIRPY_AUTH__JWT_SECRET`).
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::ACCESS_TOKEN_TTL_SECS;
use crate::auth::password::{DEFAULT_PASSWORD_COST, MAX_PASSWORD_COST, MIN_PASSWORD_COST};
use crate::auth::refresh::REFRESH_TOKEN_TTL_DAYS;

/// Default config file, relative to the working directory
pub const CONFIG_FILE: &str = "chirpy.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "CHIRPY_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    /// Deployment platform; admin reset is only allowed on `dev`
    pub platform: String,
    /// API key the payment provider sends with webhooks
    pub polka_key: String,
    /// Directory served under `/app/`
    pub assets_dir: PathBuf,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which storage backend to run and where it keeps its data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Data directory of the flat-file backend
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    FlatFile,
}

/// Token and password settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing secret shared by token issuance and verification
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_days: u64,
    /// scrypt log2(N) for newly hashed passwords
    pub password_cost: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            platform: String::new(),
            polka_key: String::new(),
            assets_dir: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_secs: ACCESS_TOKEN_TTL_SECS as u64,
            refresh_token_ttl_days: REFRESH_TOKEN_TTL_DAYS as u64,
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

impl Settings {
    /// Load from the default config file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from a specific config file and environment. A missing file is
    /// not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path)
            .extract()
            .context("failed to parse configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Layered configuration sources
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            bail!("auth.jwt_secret must be set");
        }
        if self.auth.access_token_ttl_secs == 0 {
            bail!("auth.access_token_ttl_secs must be positive");
        }
        if self.auth.refresh_token_ttl_days == 0 {
            bail!("auth.refresh_token_ttl_days must be positive");
        }
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.auth.password_cost) {
            bail!(
                "auth.password_cost must be between {MIN_PASSWORD_COST} and {MAX_PASSWORD_COST}"
            );
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            bail!("log_level must be one of {}", LOG_LEVELS.join(", "));
        }
        self.server.bind_addr()?;
        Ok(())
    }

    /// Admin-only development features are enabled
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "secret".to_string();
        settings
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.auth.access_token_ttl_secs, 3600);
        assert_eq!(settings.auth.refresh_token_ttl_days, 60);
        assert!(!settings.is_dev());
    }

    #[test]
    fn test_settings_validation() {
        assert!(valid_settings().validate().is_ok());

        // missing secret
        assert!(Settings::default().validate().is_err());

        let mut invalid = valid_settings();
        invalid.log_level = "invalid".to_string();
        assert!(invalid.validate().is_err());

        let mut invalid = valid_settings();
        invalid.auth.access_token_ttl_secs = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = valid_settings();
        invalid.auth.refresh_token_ttl_days = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = valid_settings();
        invalid.auth.password_cost = MAX_PASSWORD_COST + 1;
        assert!(invalid.validate().is_err());

        let mut invalid = valid_settings();
        invalid.server.host = "not a host".to_string();
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_load_settings() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                platform = "dev"
                log_level = "debug"

                [server]
                port = 9000

                [storage]
                backend = "flat_file"
                path = "test_data"

                [auth]
                jwt_secret = "from-file"
                "#,
            )?;
            // environment takes precedence over the file
            jail.set_env("CHIRPY_AUTH__JWT_SECRET", "from-env");
            jail.set_env("CHIRPY_POLKA_KEY", "polka");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.server.port, 9000);
            assert_eq!(settings.server.host, "127.0.0.1");
            assert_eq!(settings.storage.backend, StorageBackend::FlatFile);
            assert_eq!(settings.storage.path, PathBuf::from("test_data"));
            assert_eq!(settings.auth.jwt_secret, "from-env");
            assert_eq!(settings.auth.refresh_token_ttl_days, 60);
            assert_eq!(settings.polka_key, "polka");
            assert_eq!(settings.log_level, "debug");
            assert!(settings.is_dev());
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_defaults_and_env() {
        Jail::expect_with(|jail| {
            jail.set_env("CHIRPY_AUTH__JWT_SECRET", "env-only");

            let settings = Settings::load_from("does-not-exist.toml").map_err(|e| e.to_string())?;
            assert_eq!(settings.auth.jwt_secret, "env-only");
            assert_eq!(settings.server.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_missing_secret() {
        Jail::expect_with(|_jail| {
            assert!(Settings::load().is_err());
            Ok(())
        });
    }
}
