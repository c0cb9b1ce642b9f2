//! # enrouten-http
//!
//! HTTP layer for enrouten-rs. Provides the middleware chain built on
//! axum's request and response types, the [`Router`] that route modules
//! declare their routes on, and the URL machinery behind named routes:
//! parsed path templates, the mount-aware name registry, and reverse URL
//! generation.

pub mod middleware;
pub mod router;
pub mod urls;

pub use middleware::{
    compose, handler_fn, middleware_fn, BoxFuture, Handler, Middleware, Next, Request, Response,
};
pub use router::{parse_method, RouteBuilder, RouteEntry, RouteParams, RouteSpec, Router};
pub use urls::registry::{compose_path, NamedRoutes};
pub use urls::reverse::{reverse, UrlParams};
pub use urls::template::PathTemplate;
