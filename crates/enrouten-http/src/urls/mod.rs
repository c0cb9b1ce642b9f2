//! Named routes and reverse URL generation.
//!
//! - [`template`]: `:param` path templates, parsed once and used for both
//!   request matching and substitution
//! - [`registry`]: the mount-aware name → path table with global uniqueness
//! - [`reverse`]: building concrete URLs from a name and parameters
//!
//! # Examples
//!
//! ```
//! use enrouten_http::urls::registry::NamedRoutes;
//! use enrouten_http::urls::reverse::{reverse, UrlParams};
//!
//! let mut routes = NamedRoutes::new("/foo/");
//! routes.register("my-bar", "/bar/:id/:action").unwrap();
//!
//! assert_eq!(
//!     reverse(&routes, "my-bar", ["abc", "efg"]).as_deref(),
//!     Some("/foo/bar/abc/efg")
//! );
//! assert_eq!(
//!     reverse(&routes, "my-bar", UrlParams::keyed([("action", "edit"), ("id", "7")])).as_deref(),
//!     Some("/foo/bar/7/edit")
//! );
//! assert!(reverse(&routes, "unknown", ()).is_none());
//! ```

pub mod registry;
pub mod reverse;
pub mod template;
