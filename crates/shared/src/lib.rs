//! Shared types, errors, and configuration for the DDS VAT return engine.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency and coefficient rounding helpers
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, ServerConfig, VatConfig};
pub use error::{AppError, AppResult};
