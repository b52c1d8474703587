use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::enrichment::openrouter::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::enrichment::EnrichmentMode;

pub const DEFAULT_MESSAGE_LANGUAGE: &str = "casual Bengali (Banglish style)";
const DEVELOPMENT_JWT_SECRET: &str = "ecoscan-development-secret";

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
    pub catalog: CatalogConfig,
    pub enrichment: EnrichmentConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = var("APP_PORT")
            .or_else(|| var("PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalog = CatalogConfig {
            csv_path: var("CATALOG_CSV").map(PathBuf::from),
            read_timeout: Duration::from_millis(number("CATALOG_READ_TIMEOUT_MS", 2_000)?),
            rescore_alternatives: flag("RESCORE_ALTERNATIVES", true)?,
        };

        let enrichment = EnrichmentConfig {
            mode: choice("ENRICHMENT_MODE", EnrichmentMode::Background, parse_mode)?,
            cache: choice("ENRICHMENT_CACHE", MessageCacheKind::Memory, parse_cache)?,
            timeout: Duration::from_secs(number("ENRICHMENT_TIMEOUT_SECS", 12)?),
            api_key: var("OPENROUTER_API_KEY"),
            model: var("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: var("OPENROUTER_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            language: var("MESSAGE_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_MESSAGE_LANGUAGE.to_string()),
        };

        let jwt_secret = match var("JWT_SECRET_KEY") {
            Some(secret) => secret,
            None if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingSecret {
                    name: "JWT_SECRET_KEY",
                })
            }
            None => DEVELOPMENT_JWT_SECRET.to_string(),
        };
        let auth = AuthConfig {
            jwt_secret,
            access_ttl_minutes: i64::from(number::<u32>("ACCESS_TOKEN_TTL_MINUTES", 15)?),
            refresh_ttl_days: i64::from(number::<u32>("REFRESH_TOKEN_TTL_DAYS", 7)?),
            reward_points: i64::from(number::<u32>("REQUEST_REWARD_POINTS", 10)?),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog,
            enrichment,
            auth,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Catalog seed and read behavior.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub csv_path: Option<PathBuf>,
    pub read_timeout: Duration,
    pub rescore_alternatives: bool,
}

/// Where generated messages are kept between lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCacheKind {
    Memory,
    Catalog,
}

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub mode: EnrichmentMode,
    pub cache: MessageCacheKind,
    pub timeout: Duration,
    /// Generation is disabled when no key is configured.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub language: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub reward_points: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("reward_points", &self.reward_points)
            .finish()
    }
}

/// Set, non-blank variable.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn number<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

fn flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = var(name) else {
        return Ok(default);
    };

    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name, value }),
    }
}

fn choice<T>(
    name: &'static str,
    default: T,
    parse: fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => parse(&value.to_ascii_lowercase())
            .ok_or(ConfigError::InvalidChoice { name, value }),
    }
}

fn parse_mode(value: &str) -> Option<EnrichmentMode> {
    match value {
        "background" => Some(EnrichmentMode::Background),
        "inline" => Some(EnrichmentMode::Inline),
        "off" => Some(EnrichmentMode::Off),
        _ => None,
    }
}

fn parse_cache(value: &str) -> Option<MessageCacheKind> {
    match value {
        "memory" => Some(MessageCacheKind::Memory),
        "catalog" => Some(MessageCacheKind::Catalog),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
    InvalidBool { name: &'static str, value: String },
    InvalidChoice { name: &'static str, value: String },
    MissingSecret { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative number, got '{value}'")
            }
            ConfigError::InvalidBool { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
            ConfigError::InvalidChoice { name, value } => {
                write!(f, "{name} has unsupported value '{value}'")
            }
            ConfigError::MissingSecret { name } => {
                write!(f, "{name} must be set in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
