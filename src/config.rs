use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Result cache configuration
    pub cache: CacheConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Email (OTP delivery) configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: ACCESSTECH_)
            .add_source(
                config::Environment::with_prefix("ACCESSTECH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable the redis-backed search result cache
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Redis connection string
    pub redis_url: Option<String>,

    /// Key prefix for every cache entry
    #[serde(default = "default_cache_prefix")]
    pub key_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token lifetime (hours)
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// One-time passcode lifetime (seconds)
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            otp_ttl_secs: default_otp_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Enable OTP email delivery
    #[serde(default)]
    pub enabled: bool,

    /// SMTP relay host
    pub smtp_server: Option<String>,

    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Env var holding the SMTP username
    pub smtp_username_env: Option<String>,

    /// Env var holding the SMTP password
    pub smtp_password_env: Option<String>,

    /// From address for outgoing mail
    pub from_email: Option<String>,

    /// Display name for outgoing mail
    pub from_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Service name reported in logs
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_cache_prefix() -> String {
    "accesstech".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_otp_ttl_secs() -> u64 {
    600
}

fn default_smtp_port() -> u16 {
    587
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "accesstech".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.http_port, 8080);
        assert!(config.cache.enabled);
        assert_eq!(config.auth.otp_ttl_secs, 600);
    }
}
