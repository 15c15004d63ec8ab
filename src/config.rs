//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Query parameter carrying the caller's auth key.
pub const AUTH_KEY_PARAM: &str = "key";

/// Query parameter carrying the page URL.
pub const URL_PARAM: &str = "url";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_AUTH_KEY: &str = "dev-auth-key-do-not-use-in-production";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_WORKERS: usize = 4;
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const FETCH_TIMEOUT_SECS: u64 = 30;
    pub const MAX_PAGE_SIZE: usize = 5_242_880; // 5MB
    pub const MAX_REDIRECTS: usize = 10;
    pub const MAX_ELEMENTS: usize = 0; // no limit
    pub const USER_AGENT: &str = concat!("article-extractor/", env!("CARGO_PKG_VERSION"));
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Settings for fetching pages and running the extractor.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// TCP connect timeout for the target page
    pub connect_timeout: Duration,
    /// Total request timeout (connect + headers + body)
    pub timeout: Duration,
    /// Largest page body accepted, in bytes
    pub max_page_size: usize,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
    /// Element budget handed to the Readability parser (0 = unlimited)
    pub max_elements: usize,
    /// User-Agent sent with every fetch
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(defaults::FETCH_TIMEOUT_SECS),
            max_page_size: defaults::MAX_PAGE_SIZE,
            max_redirects: defaults::MAX_REDIRECTS,
            max_elements: defaults::MAX_ELEMENTS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

/// Application configuration.
///
/// `auth_key` is a `SecretString`, so the derived `Debug` never prints it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Shared secret callers must present as `key`
    pub auth_key: SecretString,
    /// Number of actix worker threads
    pub workers: usize,
    /// Page fetch settings
    pub fetch: FetchSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode every variable has a default. In production
    /// `EXTRACTOR_AUTH_KEY` is required and must not be the development
    /// default.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `EXTRACTOR_HOST`: Server host (default: 127.0.0.1)
    /// - `EXTRACTOR_PORT`: Server port (default: 8080)
    /// - `EXTRACTOR_AUTH_KEY`: Shared auth key (required in production)
    /// - `EXTRACTOR_WORKERS`: Worker threads (default: 4 in dev, CPU count in prod)
    /// - `EXTRACTOR_CONNECT_TIMEOUT_SECS`: Fetch connect timeout (default: 5)
    /// - `EXTRACTOR_FETCH_TIMEOUT_SECS`: Fetch total timeout (default: 30)
    /// - `EXTRACTOR_MAX_PAGE_SIZE`: Max page size in bytes (default: 5MB)
    /// - `EXTRACTOR_MAX_REDIRECTS`: Max redirects followed (default: 10)
    /// - `EXTRACTOR_MAX_ELEMENTS`: Readability element budget (default: 0, unlimited)
    /// - `EXTRACTOR_USER_AGENT`: User-Agent for fetches
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("EXTRACTOR_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = parse_var(
            "EXTRACTOR_PORT",
            defaults::DEV_PORT,
            "EXTRACTOR_PORT must be a valid port number",
        )?;

        let auth_key = match env::var("EXTRACTOR_AUTH_KEY") {
            Ok(key) => key,
            Err(_) if environment.is_development() => defaults::DEV_AUTH_KEY.to_string(),
            Err(_) => return Err(ConfigError::MissingEnvVar("EXTRACTOR_AUTH_KEY")),
        };

        let default_workers = if environment.is_development() {
            defaults::DEV_WORKERS
        } else {
            num_cpus::get()
        };
        let workers = parse_var(
            "EXTRACTOR_WORKERS",
            default_workers,
            "EXTRACTOR_WORKERS must be a valid number",
        )?;

        let connect_timeout_secs = parse_var(
            "EXTRACTOR_CONNECT_TIMEOUT_SECS",
            defaults::CONNECT_TIMEOUT_SECS,
            "EXTRACTOR_CONNECT_TIMEOUT_SECS must be a valid number",
        )?;
        let fetch_timeout_secs = parse_var(
            "EXTRACTOR_FETCH_TIMEOUT_SECS",
            defaults::FETCH_TIMEOUT_SECS,
            "EXTRACTOR_FETCH_TIMEOUT_SECS must be a valid number",
        )?;

        let fetch = FetchSettings {
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            timeout: Duration::from_secs(fetch_timeout_secs),
            max_page_size: parse_var(
                "EXTRACTOR_MAX_PAGE_SIZE",
                defaults::MAX_PAGE_SIZE,
                "EXTRACTOR_MAX_PAGE_SIZE must be a valid number",
            )?,
            max_redirects: parse_var(
                "EXTRACTOR_MAX_REDIRECTS",
                defaults::MAX_REDIRECTS,
                "EXTRACTOR_MAX_REDIRECTS must be a valid number",
            )?,
            max_elements: parse_var(
                "EXTRACTOR_MAX_ELEMENTS",
                defaults::MAX_ELEMENTS,
                "EXTRACTOR_MAX_ELEMENTS must be a valid number",
            )?,
            user_agent: env::var("EXTRACTOR_USER_AGENT")
                .unwrap_or_else(|_| defaults::USER_AGENT.to_string()),
        };

        let config = Config {
            environment,
            host,
            port,
            auth_key: SecretString::from(auth_key),
            workers,
            fetch,
        };

        config.validate()?;
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Checks that apply in every environment.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_key.expose_secret().is_empty() {
            return Err(ConfigError::InvalidValue(
                "EXTRACTOR_AUTH_KEY must not be empty",
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue(
                "EXTRACTOR_WORKERS must be at least 1",
            ));
        }
        if self.fetch.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "EXTRACTOR_CONNECT_TIMEOUT_SECS must be at least 1",
            ));
        }
        if self.fetch.timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "EXTRACTOR_FETCH_TIMEOUT_SECS must be at least 1",
            ));
        }
        Ok(())
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.auth_key.expose_secret() == defaults::DEV_AUTH_KEY {
            errors.push(
                "EXTRACTOR_AUTH_KEY is using development default. Set a secure auth key."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(
    name: &'static str,
    default: T,
    invalid: &'static str,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(invalid)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
