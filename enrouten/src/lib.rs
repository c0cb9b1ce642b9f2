//! # enrouten
//!
//! Convention-based route assembly for axum applications.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `enrouten` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```no_run
//! use enrouten::{enrouten, App, Options, Settings};
//!
//! # async fn example() -> enrouten::EnroutenResult<()> {
//! let settings = Settings::default().with_directory("controllers");
//! let mut app = App::new(settings.clone());
//! let middleware = enrouten(&mut app, Options::new(settings))?;
//! app.use_middleware(middleware);
//! app.serve().await
//! # }
//! ```

/// Settings, error types and logging setup.
pub use enrouten_core as core;

/// Routers, middleware chains, path templates and reverse URLs.
pub use enrouten_http as http;

/// Directory scanning, module tables, index and explicit route loading.
pub use enrouten_loader as loader;

/// The application host and the `enrouten()` entry point.
#[cfg(feature = "app")]
pub use enrouten_app as app;

/// Testing utilities.
#[cfg(feature = "testing")]
pub use enrouten_test as test;

pub use enrouten_core::{EnroutenError, EnroutenResult, RouterOptions, Settings};
pub use enrouten_http::{handler_fn, middleware_fn, Router};
pub use enrouten_loader::{ModuleTable, RouteDefinition};

#[cfg(feature = "app")]
pub use enrouten_app::{enrouten, url, App, Enrouten, Options};

// Third-party re-exports
pub use axum;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;
