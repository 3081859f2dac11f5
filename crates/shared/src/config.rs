//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Compliance scoring weights.
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

/// Weights of the compliance scoring heuristic.
///
/// Each weight is the number of points subtracted from 100 per occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ComplianceConfig {
    /// Points per activity whose review date has passed.
    #[serde(default = "default_overdue_review_weight")]
    pub overdue_review_weight: u32,
    /// Points per activity that needs DPO review and has none.
    #[serde(default = "default_missing_dpo_review_weight")]
    pub missing_dpo_review_weight: u32,
    /// Points per special-category link without a justification.
    #[serde(default = "default_unjustified_special_weight")]
    pub unjustified_special_category_weight: u32,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            overdue_review_weight: default_overdue_review_weight(),
            missing_dpo_review_weight: default_missing_dpo_review_weight(),
            unjustified_special_category_weight: default_unjustified_special_weight(),
        }
    }
}

fn default_overdue_review_weight() -> u32 {
    10
}

fn default_missing_dpo_review_weight() -> u32 {
    15
}

fn default_unjustified_special_weight() -> u32 {
    20
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DATAGUARD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("DATAGUARD__SERVER__PORT", Some("9090")),
                (
                    "DATAGUARD__DATABASE__URL",
                    Some("postgres://localhost/dataguard"),
                ),
                ("DATAGUARD__JWT__SECRET", Some("s3cret")),
                ("DATAGUARD__LOGGING__FORMAT", Some("json")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/dataguard");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "s3cret");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.logging.format, LogFormat::Json);
                assert_eq!(config.compliance, ComplianceConfig::default());
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("DATAGUARD__SERVER__PORT", Some("9090")),
                ("DATAGUARD__DATABASE__URL", None),
                ("DATAGUARD__JWT__SECRET", Some("s3cret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_default_compliance_weights() {
        let weights = ComplianceConfig::default();
        assert_eq!(weights.overdue_review_weight, 10);
        assert_eq!(weights.missing_dpo_review_weight, 15);
        assert_eq!(weights.unjustified_special_category_weight, 20);
    }
}
