//! # enrouten-app
//!
//! The application side of enrouten-rs: an [`App`] host that owns a
//! middleware stack and a shared context, the [`Enrouten`] context installed
//! into it, and the [`enrouten()`] entry point that assembles a route table
//! from all configured sources.
//!
//! ## Modules
//!
//! - [`server`] - The `App` host and its conversion into an `axum::Router`
//! - [`context`] - The installed `Enrouten` context and the `url` helper
//! - [`setup`] - Setup options and the `enrouten()` entry point

pub mod context;
pub mod server;
pub mod setup;

pub use context::{url, Enrouten};
pub use server::{App, AppContext};
pub use setup::{enrouten, Options};
