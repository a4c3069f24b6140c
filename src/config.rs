use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::matcher::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::core::report::NotificationTemplate;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub event: EventSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// History database. Without a URL the service keeps history in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    pub time_limit_ms: Option<u64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            time_limit_ms: None,
        }
    }
}

fn default_max_attempts() -> u32 { DEFAULT_MAX_ATTEMPTS }

impl MatchingSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}

/// Dates quoted in the assignment message
#[derive(Debug, Clone, Deserialize)]
pub struct EventSettings {
    #[serde(default = "default_check_in_date")]
    pub check_in_date: String,
    #[serde(default = "default_due_date")]
    pub due_date: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            check_in_date: default_check_in_date(),
            due_date: default_due_date(),
        }
    }
}

fn default_check_in_date() -> String { NotificationTemplate::default().check_in_date }
fn default_due_date() -> String { NotificationTemplate::default().due_date }

impl EventSettings {
    pub fn notification_template(&self) -> NotificationTemplate {
        NotificationTemplate::new(self.check_in_date.clone(), self.due_date.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ARTSWAP_)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ARTSWAP__MATCHING__MAX_ATTEMPTS -> matching.max_attempts
            .add_source(environment());

        with_database_url(builder)?.build()?.try_deserialize()
    }

    /// Load configuration from a custom path, with the same environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment());

        with_database_url(builder)?.build()?.try_deserialize()
    }

    /// `ARTSWAP_CONFIG` points at an explicit file; otherwise use the default layers
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }
}

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "ARTSWAP_CONFIG";

fn with_database_url(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(database_url) => builder.set_override("database.url", database_url),
        Err(_) => Ok(builder),
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ARTSWAP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.max_attempts, 100);
        assert_eq!(matching.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_overrides_from_source() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                [matching]
                max_attempts = 250
                time_limit_ms = 1500

                [event]
                due_date = "May 30th"
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let policy = settings.matching.retry_policy();
        assert_eq!(policy.max_attempts, 250);
        assert_eq!(policy.time_limit, Some(Duration::from_millis(1500)));

        let template = settings.event.notification_template();
        assert_eq!(template.due_date, "May 30th");
        assert_eq!(template.check_in_date, "March 21st");
        assert!(settings.database.url.is_none());
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let path = std::env::temp_dir().join(format!("artswap-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            port = 9191

            [matching]
            max_attempts = 42
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.matching.retry_policy().max_attempts, 42);
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let path = std::env::temp_dir().join(format!("artswap-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(Settings::load_from(&path).is_err());
    }
}
