//! # enrouten-loader
//!
//! The three route sources of enrouten-rs and the pieces they share.
//!
//! ## Modules
//!
//! - [`resolve`] - Resolving configured paths against a base directory
//! - [`scanner`] - Deterministic recursive directory walk
//! - [`module`] - Route modules and the table that maps files to them
//! - [`directory`] - Mounting one sub-router per discovered module
//! - [`index`] - Loading a single module onto the root router
//! - [`routes`] - Registering an explicit list of route definitions

pub mod directory;
pub mod index;
pub mod module;
pub mod resolve;
pub mod routes;
pub mod scanner;

pub use directory::{bind_directory, mount_point};
pub use index::load_index;
pub use module::{Module, ModuleLoader, ModuleTable, RouteModule};
pub use resolve::resolve;
pub use routes::{load_routes, RouteDefinition};
pub use scanner::scan;
