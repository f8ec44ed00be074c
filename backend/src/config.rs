//! Server configuration from command-line flags and environment variables.

use axum::http::HeaderValue;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{ScheduleRules, SmtpConfig};
use crate::error::ConfigError;
use crate::storage::StoreSettings;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "vaccination-registry",
    version,
    about = "Child vaccination registry: record intake and schedule listing"
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "REGISTRY_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:vaccination.db")]
    pub database_url: String,

    #[arg(long, env = "REGISTRY_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Upper bound on any record store access, in milliseconds
    #[arg(long, env = "REGISTRY_STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,

    /// YAML vaccination rule set; the built-in table is used when absent
    #[arg(long, env = "REGISTRY_SCHEDULE_FILE")]
    pub schedule_file: Option<PathBuf>,

    /// Directory of static pages served for unmatched paths
    #[arg(long, env = "REGISTRY_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    #[arg(long, env = "REGISTRY_CORS_ORIGIN", default_value = "http://localhost:8080")]
    pub cors_origin: String,

    /// SMTP relay for schedule reminders; reminders are off when unset
    #[arg(long, env = "REGISTRY_SMTP_SERVER")]
    pub smtp_server: Option<String>,

    #[arg(long, env = "REGISTRY_SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    #[arg(long, env = "REGISTRY_SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    #[arg(long, env = "REGISTRY_SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Sender address for reminders
    #[arg(long, env = "REGISTRY_SMTP_FROM")]
    pub smtp_from: Option<String>,

    /// Enable debug logging for the registry
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(Self::invalid("database-url", "cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(Self::invalid("max-connections", "must be at least 1"));
        }
        if self.store_timeout_ms == 0 {
            return Err(Self::invalid("store-timeout-ms", "must be at least 1"));
        }
        if self.cors_origin.parse::<HeaderValue>().is_err() {
            return Err(Self::invalid("cors-origin", "is not a valid header value"));
        }

        match (&self.smtp_server, &self.smtp_from) {
            (Some(_), None) => return Err(Self::invalid("smtp-from", "is required when smtp-server is set")),
            (None, Some(_)) => return Err(Self::invalid("smtp-server", "is required when smtp-from is set")),
            _ => {}
        }
        if self.smtp_username.is_some() != self.smtp_password.is_some() {
            return Err(Self::invalid(
                "smtp-username",
                "smtp-username and smtp-password must be set together",
            ));
        }

        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            max_connections: self.max_connections,
            timeout: self.store_timeout(),
        }
    }

    /// The rule file if configured, otherwise the built-in rule set
    pub fn schedule_rules(&self) -> Result<ScheduleRules, ConfigError> {
        match &self.schedule_file {
            Some(path) => ScheduleRules::load(path),
            None => Ok(ScheduleRules::builtin()),
        }
    }

    pub fn smtp_config(&self) -> Option<SmtpConfig> {
        let (server, from) = (self.smtp_server.as_ref()?, self.smtp_from.as_ref()?);
        Some(SmtpConfig {
            smtp_server: server.clone(),
            smtp_port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from_email: from.clone(),
        })
    }

    fn invalid(field: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["vaccination-registry", "--database-url", "sqlite::memory:"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).expect("Failed to parse arguments")
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = parse(&[]);

        assert!(config.validate().is_ok());
        assert_eq!(config.store_settings().max_connections, config.max_connections);
        assert!(config.smtp_config().is_none());
    }

    #[test]
    fn test_explicit_values() {
        let config = parse(&[
            "--bind",
            "0.0.0.0:8000",
            "--store-timeout-ms",
            "250",
            "--max-connections",
            "2",
            "--verbose",
        ]);

        assert_eq!(config.bind, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.store_timeout(), Duration::from_millis(250));
        assert_eq!(config.store_settings().max_connections, 2);
        assert!(config.verbose);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = parse(&["--store-timeout-ms", "0"]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_partial_smtp_config_is_rejected() {
        let config = parse(&["--smtp-server", "smtp.example.com"]);
        assert!(config.validate().is_err());

        let config = parse(&[
            "--smtp-server",
            "smtp.example.com",
            "--smtp-from",
            "registry@example.com",
            "--smtp-username",
            "registry",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_complete_smtp_config() {
        let config = parse(&[
            "--smtp-server",
            "smtp.example.com",
            "--smtp-port",
            "2525",
            "--smtp-from",
            "registry@example.com",
        ]);

        assert!(config.validate().is_ok());
        let smtp = config.smtp_config().expect("smtp config");
        assert_eq!(smtp.smtp_server, "smtp.example.com");
        assert_eq!(smtp.smtp_port, 2525);
        assert!(smtp.username.is_none());
    }

    #[test]
    fn test_builtin_rules_without_schedule_file() {
        let config = parse(&[]);
        let rules = config.schedule_rules().expect("builtin rules");
        assert_eq!(rules, ScheduleRules::builtin());
    }
}
