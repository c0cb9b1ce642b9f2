//! # enrouten-core
//!
//! Core types, settings, and error types for the enrouten-rs workspace.
//! This crate has no HTTP dependencies and provides the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Setup configuration and router options
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{EnroutenError, EnroutenResult};
pub use settings::{RouterOptions, Settings};
