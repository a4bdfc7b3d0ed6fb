use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::layout::EstimateMode;

/// Origins of the local frontend dev server, always allowed by CORS.
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    /// Extra production origin, added to `DEV_ORIGINS`.
    pub cors_origin: Option<String>,
    pub max_upload_bytes: usize,
    pub estimate_mode: EstimateMode,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5006".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            estimate_mode: match std::env::var("PAGE_ESTIMATE_MODE") {
                Ok(v) => v
                    .parse::<EstimateMode>()
                    .map_err(|e| anyhow!(e))
                    .context("PAGE_ESTIMATE_MODE is invalid")?,
                Err(_) => EstimateMode::default(),
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Every origin the CORS layer should accept.
    pub fn allowed_origins(&self) -> Vec<String> {
        DEV_ORIGINS
            .iter()
            .map(|o| o.to_string())
            .chain(self.cors_origin.clone())
            .collect()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    /// Config for handler tests; nothing is read from the environment.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            port: 0,
            upload_dir,
            cors_origin: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            estimate_mode: EstimateMode::Markup,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins_include_dev_servers() {
        let config = Config::for_tests(PathBuf::from("uploads"));
        assert_eq!(config.allowed_origins(), DEV_ORIGINS.to_vec());
    }

    #[test]
    fn test_allowed_origins_append_production_origin() {
        let mut config = Config::for_tests(PathBuf::from("uploads"));
        config.cors_origin = Some("https://tareas.example.com".to_string());
        let origins = config.allowed_origins();
        assert_eq!(origins.len(), 3);
        assert_eq!(origins[2], "https://tareas.example.com");
    }

    #[test]
    fn test_require_env_reports_missing_key() {
        let err = require_env("PAPERWRIGHT_SURELY_UNSET_VAR").unwrap_err();
        assert!(err.to_string().contains("PAPERWRIGHT_SURELY_UNSET_VAR"));
    }
}
