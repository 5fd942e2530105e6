use std::env;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_PHONE_PREFIXES: &str = "679";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let prefixes =
            env::var("APP_PHONE_PREFIXES").unwrap_or_else(|_| DEFAULT_PHONE_PREFIXES.to_string());
        let intake = IntakeConfig::from_prefixes(&prefixes)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locale-dependent knobs for candidate field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Digits a mobile phone number may start with.
    pub phone_leading_digits: Vec<char>,
}

impl IntakeConfig {
    pub fn from_prefixes(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidPhonePrefixes {
                value: raw.to_string(),
            });
        }

        let mut phone_leading_digits: Vec<char> = trimmed.chars().collect();
        phone_leading_digits.sort_unstable();
        phone_leading_digits.dedup();

        Ok(Self {
            phone_leading_digits,
        })
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            phone_leading_digits: DEFAULT_PHONE_PREFIXES.chars().collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("APP_PHONE_PREFIXES must be a non-empty list of digits, got '{value}'")]
    InvalidPhonePrefixes { value: String },
}
