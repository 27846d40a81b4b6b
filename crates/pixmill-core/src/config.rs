//! Configuration module
//!
//! Service settings are read once at startup from the environment (a `.env`
//! file is honoured) and validated before the server binds.

use std::env;
use std::str::FromStr;
use std::time::Duration;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 5050;
const MAX_UPLOAD_SIZE_MB: usize = 32;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_QUALITY: u8 = 80;
const MAX_DIMENSION: u32 = 10_000;
const CACHE_MAX_AGE_SECS: u64 = 86_400;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Invalid LOG_FORMAT: {}", other)),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Upper bound for a whole multipart body held in memory
    pub max_upload_size_bytes: usize,
    pub request_timeout: Duration,
    pub default_width: u32,
    pub default_height: u32,
    pub default_quality: u8,
    pub max_dimension: u32,
    pub cache_max_age_secs: u64,
    /// Server-wide cap on in-flight requests
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            default_quality: DEFAULT_QUALITY,
            max_dimension: MAX_DIMENSION,
            cache_max_age_secs: CACHE_MAX_AGE_SECS,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: LogFormat::Compact,
        }
    }
}

/// Parse `key` from `lookup`, falling back to `default` when unset or invalid.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => PORT,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let upload_mb = parse_or(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", upload_mb))?;

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Compact,
        };

        let config = Config {
            host: lookup("HOST").unwrap_or_else(|| HOST.to_string()),
            port,
            environment,
            cors_origins,
            max_upload_size_bytes,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                REQUEST_TIMEOUT_SECS,
            )),
            default_width: parse_or(&lookup, "DEFAULT_WIDTH", DEFAULT_WIDTH),
            default_height: parse_or(&lookup, "DEFAULT_HEIGHT", DEFAULT_HEIGHT),
            default_quality: parse_or(&lookup, "DEFAULT_QUALITY", DEFAULT_QUALITY),
            max_dimension: parse_or(&lookup, "MAX_DIMENSION", MAX_DIMENSION),
            cache_max_age_secs: parse_or(&lookup, "CACHE_MAX_AGE_SECS", CACHE_MAX_AGE_SECS),
            http_concurrency_limit: parse_or(
                &lookup,
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            ),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than zero"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be greater than zero"));
        }

        if self.default_width == 0 || self.default_height == 0 {
            return Err(anyhow::anyhow!(
                "DEFAULT_WIDTH and DEFAULT_HEIGHT must be greater than zero"
            ));
        }

        if !(1..=100).contains(&self.default_quality) {
            return Err(anyhow::anyhow!("DEFAULT_QUALITY must be between 1 and 100"));
        }

        if self.default_width > self.max_dimension || self.default_height > self.max_dimension {
            return Err(anyhow::anyhow!(
                "Default dimensions cannot exceed MAX_DIMENSION ({})",
                self.max_dimension
            ));
        }

        if self.is_production() && self.allows_any_origin() {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Value for the `Cache-Control` header on binary responses
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }
}
