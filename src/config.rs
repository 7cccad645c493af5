//! Application configuration loaded from environment variables.

use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

/// URL that selects the in-memory record store instead of PostgreSQL.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "postgres://qa:qa@localhost:5432/qa_results";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;

    // Connection pool policy
    pub const DB_MAX_CONNECTIONS: u32 = 100;
    pub const DB_MIN_CONNECTIONS: u32 = 5;
    pub const DB_CONNECT_TIMEOUT_MS: u64 = 5_000;
    pub const DB_ACQUIRE_TIMEOUT_MS: u64 = 5_000;
    pub const DB_STATEMENT_TIMEOUT_MS: u64 = 30_000;
    pub const DB_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    pub const DB_MAX_LIFETIME_SECS: u64 = 1_800; // 30 minutes

    pub const RUN_IDS_PAGE_SIZE: u32 = 10;
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

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
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

/// Database connection and pool configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string, or `memory://`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Socket connect timeout
    pub connect_timeout: Duration,
    /// Maximum wait for a pooled connection
    pub acquire_timeout: Duration,
    /// Server-side statement timeout, bounds read latency
    pub statement_timeout: Duration,
    /// Idle connections are evicted after this long
    pub idle_timeout: Duration,
    /// Connections are recycled after this long
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Whether the in-memory store was requested.
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }

    /// Connection URL with the statement timeout passed as a startup option.
    pub fn connection_url(&self) -> String {
        let option = format!(
            "-c statement_timeout={}",
            self.statement_timeout.as_millis()
        );
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}options={}",
            self.url,
            separator,
            urlencoding::encode(&option)
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: defaults::DEV_DATABASE_URL.to_string(),
            max_connections: defaults::DB_MAX_CONNECTIONS,
            min_connections: defaults::DB_MIN_CONNECTIONS,
            connect_timeout: Duration::from_millis(defaults::DB_CONNECT_TIMEOUT_MS),
            acquire_timeout: Duration::from_millis(defaults::DB_ACQUIRE_TIMEOUT_MS),
            statement_timeout: Duration::from_millis(defaults::DB_STATEMENT_TIMEOUT_MS),
            idle_timeout: Duration::from_secs(defaults::DB_IDLE_TIMEOUT_SECS),
            max_lifetime: Duration::from_secs(defaults::DB_MAX_LIFETIME_SECS),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Record store configuration
    pub database: DatabaseConfig,
    /// Page size of the distinct run-id listing
    pub run_ids_page_size: NonZeroU32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development):
    /// - All variables have sensible defaults
    /// - Only RUST_ENV is required
    ///
    /// In production mode (RUST_ENV=production):
    /// - DATABASE_URL is required and must point at PostgreSQL
    /// - Server will NOT start if using development defaults
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `QRS_HOST`: Server host (default: 127.0.0.1)
    /// - `QRS_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: PostgreSQL connection string, or `memory://` (development only)
    /// - `QRS_DB_MAX_CONNECTIONS`: Pool upper bound (default: 100)
    /// - `QRS_DB_MIN_CONNECTIONS`: Pool lower bound (default: 5)
    /// - `QRS_DB_CONNECT_TIMEOUT_MS`: Connect timeout (default: 5000)
    /// - `QRS_DB_ACQUIRE_TIMEOUT_MS`: Pool wait timeout (default: 5000)
    /// - `QRS_DB_STATEMENT_TIMEOUT_MS`: Read/statement timeout (default: 30000)
    /// - `QRS_DB_IDLE_TIMEOUT_SECS`: Idle eviction (default: 600)
    /// - `QRS_DB_MAX_LIFETIME_SECS`: Connection lifetime (default: 1800)
    /// - `QRS_RUN_IDS_PAGE_SIZE`: Run-id page size (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Parse environment - required
        let env_str = lookup("RUST_ENV").ok_or(ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        // Load values with defaults
        let host = lookup("QRS_HOST").unwrap_or_else(|| defaults::DEV_HOST.to_string());

        let port = parse_or(
            &lookup,
            "QRS_PORT",
            defaults::DEV_PORT,
            "QRS_PORT must be a valid port number",
        )?;

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or_else(|| defaults::DEV_DATABASE_URL.to_string()),
            max_connections: parse_or(
                &lookup,
                "QRS_DB_MAX_CONNECTIONS",
                defaults::DB_MAX_CONNECTIONS,
                "QRS_DB_MAX_CONNECTIONS must be a valid number",
            )?,
            min_connections: parse_or(
                &lookup,
                "QRS_DB_MIN_CONNECTIONS",
                defaults::DB_MIN_CONNECTIONS,
                "QRS_DB_MIN_CONNECTIONS must be a valid number",
            )?,
            connect_timeout: Duration::from_millis(parse_or(
                &lookup,
                "QRS_DB_CONNECT_TIMEOUT_MS",
                defaults::DB_CONNECT_TIMEOUT_MS,
                "QRS_DB_CONNECT_TIMEOUT_MS must be a valid number",
            )?),
            acquire_timeout: Duration::from_millis(parse_or(
                &lookup,
                "QRS_DB_ACQUIRE_TIMEOUT_MS",
                defaults::DB_ACQUIRE_TIMEOUT_MS,
                "QRS_DB_ACQUIRE_TIMEOUT_MS must be a valid number",
            )?),
            statement_timeout: Duration::from_millis(parse_or(
                &lookup,
                "QRS_DB_STATEMENT_TIMEOUT_MS",
                defaults::DB_STATEMENT_TIMEOUT_MS,
                "QRS_DB_STATEMENT_TIMEOUT_MS must be a valid number",
            )?),
            idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "QRS_DB_IDLE_TIMEOUT_SECS",
                defaults::DB_IDLE_TIMEOUT_SECS,
                "QRS_DB_IDLE_TIMEOUT_SECS must be a valid number",
            )?),
            max_lifetime: Duration::from_secs(parse_or(
                &lookup,
                "QRS_DB_MAX_LIFETIME_SECS",
                defaults::DB_MAX_LIFETIME_SECS,
                "QRS_DB_MAX_LIFETIME_SECS must be a valid number",
            )?),
        };

        if database.min_connections > database.max_connections {
            return Err(ConfigError::InvalidValue(
                "QRS_DB_MIN_CONNECTIONS must not exceed QRS_DB_MAX_CONNECTIONS",
            ));
        }

        let page_size: u32 = parse_or(
            &lookup,
            "QRS_RUN_IDS_PAGE_SIZE",
            defaults::RUN_IDS_PAGE_SIZE,
            "QRS_RUN_IDS_PAGE_SIZE must be a valid number",
        )?;
        let run_ids_page_size = NonZeroU32::new(page_size).ok_or(ConfigError::InvalidValue(
            "QRS_RUN_IDS_PAGE_SIZE must be greater than zero",
        ))?;

        let config = Config {
            environment,
            host,
            port,
            database,
            run_ids_page_size,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production PostgreSQL URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.database.is_memory() {
            errors.push(
                "DATABASE_URL selects the in-memory store, which is not durable. Set a PostgreSQL URL."
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

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T, message: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(message)),
        None => Ok(default),
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
