//! Shared types, errors, and configuration for Fabrika.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The explicit request context (tenant + acting principal)
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use context::RequestContext;
pub use error::{AppError, AppResult};
