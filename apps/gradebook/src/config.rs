//! # Server Configuration
//!
//! Configuration is layered, later layers win:
//! 1. Built-in defaults
//! 2. TOML file passed with `--config`
//! 3. Environment variables
//! 4. CLI flags (applied by the `server` command)
//!
//! ## Environment Variables
//!
//! - `GRADEBOOK_HOST`: Bind host
//! - `GRADEBOOK_PORT`: Bind port
//! - `GRADEBOOK_RATE_LIMIT`: Requests per second (0 disables)
//! - `GRADEBOOK_CORS_ORIGINS`: Comma-separated origins, or "*" for all
//! - `GRADEBOOK_STRICT_IDS`: "true"/"1" to reject updates whose record id differs from the path id
//! - `GRADEBOOK_SEED`: Roster JSON file loaded at startup
//!
//! ## Example
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! rate_limit = 50
//! cors_origins = ["https://school.example.com"]
//! strict_update_ids = true
//! seed = "roster.json"
//! ```

use crate::error::AppError;
use gradebook_core::IdPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Runtime configuration of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Global requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only, `["*"]` means any.
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,
    /// Reject updates whose record id differs from the path id.
    pub strict_update_ids: bool,
    /// Roster JSON file loaded into the registry at startup.
    pub seed: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: Vec::new(),
            body_limit_bytes: 64 * 1024,
            strict_update_ids: false,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load defaults, then the optional TOML file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AppError::Config(format!(
                "Config file size {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `GRADEBOOK_*` overrides using `lookup` to resolve variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GRADEBOOK_HOST").filter(|h| !h.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("GRADEBOOK_PORT") {
            self.port = parse_var("GRADEBOOK_PORT", &port)?;
        }
        if let Some(rate) = lookup("GRADEBOOK_RATE_LIMIT") {
            self.rate_limit = parse_var("GRADEBOOK_RATE_LIMIT", &rate)?;
        }
        if let Some(origins) = lookup("GRADEBOOK_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(strict) = lookup("GRADEBOOK_STRICT_IDS") {
            self.strict_update_ids = parse_flag("GRADEBOOK_STRICT_IDS", &strict)?;
        }
        if let Some(seed) = lookup("GRADEBOOK_SEED").filter(|s| !s.is_empty()) {
            self.seed = Some(PathBuf::from(seed));
        }
        Ok(())
    }

    /// Id policy the registry should run with.
    pub fn id_policy(&self) -> IdPolicy {
        if self.strict_update_ids {
            IdPolicy::Strict
        } else {
            IdPolicy::Lenient
        }
    }

    /// `host:port` address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has invalid value '{}'", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} has invalid value '{}'",
            key, value
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================
