//! # Gradebook
//!
//! HTTP server and configuration for the Gradebook registry.
//!
//! - `api` - axum router, handlers and middleware
//! - `config` - layered server configuration (TOML + environment)
//! - `error` - application error type and its HTTP mapping

pub mod api;
pub mod config;
pub mod error;

pub use config::ServerConfig;
pub use error::AppError;
