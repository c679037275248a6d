//! Shared types, errors, and configuration for Civica.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision and display formatting
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, FinancingConfig, LoggingConfig, ServerConfig};
pub use error::AppError;
pub use types::{Currency, Money};
