//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use vforge_models::DEFAULT_RETENTION_HOURS;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max multipart payload in bytes
    pub max_body_size: usize,
    /// Root of local scratch storage
    pub scratch_dir: PathBuf,
    /// FFmpeg binary
    pub ffmpeg_path: String,
    /// Environment (development/production)
    pub environment: String,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Artifact retention
    pub retention: RetentionConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 20 * 1024 * 1024, // 20MB
            scratch_dir: PathBuf::from("./scratch"),
            ffmpeg_path: "ffmpeg".to_string(),
            environment: "development".to_string(),
            metrics_enabled: true,
            retention: RetentionConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            scratch_dir: std::env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            ffmpeg_path: std::env::var("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: env_flag("METRICS_ENABLED").unwrap_or(defaults.metrics_enabled),
            retention: RetentionConfig::from_env(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

/// Retention sweeper configuration.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    pub enabled: bool,
    /// Artifacts strictly older than this are deleted
    pub max_age: Duration,
    /// Time between sweeps
    pub interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: Duration::from_secs(DEFAULT_RETENTION_HOURS as u64 * 3600),
            interval: Duration::from_secs(3600),
        }
    }
}

impl RetentionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("RETENTION_ENABLED").unwrap_or(defaults.enabled),
            max_age: env_parse::<u64>("RETENTION_MAX_AGE_HOURS")
                .map(|h| Duration::from_secs(h * 3600))
                .unwrap_or(defaults.max_age),
            interval: env_parse::<u64>("RETENTION_INTERVAL_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_body_size, 20_971_520);
        assert!(!config.is_production());
        assert_eq!(config.retention.max_age, Duration::from_secs(24 * 3600));
        assert_eq!(config.retention.interval, Duration::from_secs(3600));
    }

    #[test]
    fn test_production_flag() {
        let config = ApiConfig {
            environment: "Production".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.is_production());
    }
}
