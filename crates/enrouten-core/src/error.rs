//! Core error types for enrouten-rs.
//!
//! [`EnroutenError`] covers everything that can go wrong while a route table is
//! being assembled. All of its variants are configuration errors: they are
//! returned from setup, never raised while serving requests. Request-time
//! lookups that can legitimately miss (such as reverse URL resolution) return
//! `Option` instead.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for enrouten-rs.
///
/// Any of these aborts the whole setup call; the host never receives a
/// partially configured router.
#[derive(Error, Debug)]
pub enum EnroutenError {
    // ── Route table ──────────────────────────────────────────────────

    /// A route name was registered twice, from any combination of sources.
    #[error("A route already exists for the name '{0}'")]
    DuplicateRouteName(String),

    /// An explicit route definition is missing a required field.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An explicit route definition names an HTTP method the router cannot register.
    #[error("Unsupported route method '{0}'")]
    InvalidMethod(String),

    /// A path template could not be compiled.
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The template as declared.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    // ── Module loading ───────────────────────────────────────────────

    /// The configured index module does not exist on disk.
    #[error("Cannot find module '{}'", .0.display())]
    ModuleNotFound(PathBuf),

    /// The configured index module is not a route module factory.
    #[error("Module '{}' is not a route module", .0.display())]
    InvalidModule(PathBuf),

    /// A directory configured for scanning is missing or cannot be read.
    #[error("Cannot read directory '{}': {source}", path.display())]
    DirectoryUnreadable {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A route module reported that it could not register its routes.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A convenience type alias for `Result<T, EnroutenError>`.
pub type EnroutenResult<T> = Result<T, EnroutenError>;
