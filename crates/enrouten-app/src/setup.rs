//! The `enrouten()` entry point.
//!
//! Setup builds one root router from up to three sources, always in this
//! order:
//!
//! 1. the index module (`settings.index`), applied to the root router as is
//! 2. the route directory (`settings.directory`), one mounted sub-router per
//!    route module found
//! 3. the explicit route list (`Options::routes`)
//!
//! Named routes from all three end up in one table, so a name can only be
//! used once across the application. When every source has been applied the
//! table is installed on the application and the root router is returned as
//! a single middleware, ready to be mounted at `settings.mountpath`.
//!
//! # Examples
//!
//! ```no_run
//! use enrouten_app::{enrouten, url, App, Options};
//! use enrouten_core::Settings;
//! use enrouten_http::handler_fn;
//! use enrouten_loader::{ModuleTable, RouteDefinition};
//!
//! # fn example() -> enrouten_core::EnroutenResult<()> {
//! let settings = Settings::default()
//!     .with_basedir("/srv/app")
//!     .with_directory("controllers");
//! let modules = ModuleTable::new().factory("controllers/users.rs", |router| {
//!     router.named("user").get("/:id", handler_fn(|_req| async { "user" }))?;
//!     Ok(())
//! });
//! let options = Options::new(settings)
//!     .with_modules(modules)
//!     .with_routes(vec![RouteDefinition::new("/health", handler_fn(|_req| async { "ok" }))]);
//!
//! let mut app = App::new(Settings::default());
//! let middleware = enrouten(&mut app, options)?;
//! app.use_middleware(middleware);
//!
//! assert_eq!(url(&app, "user", 42).as_deref(), Some("/users/42"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use enrouten_core::{EnroutenResult, Settings};
use enrouten_http::middleware::Middleware;
use enrouten_http::router::Router;
use enrouten_http::urls::registry::NamedRoutes;
use enrouten_loader::{bind_directory, load_index, load_routes, resolve, ModuleTable, RouteDefinition};

use crate::context::Enrouten;
use crate::server::App;

/// Everything one `enrouten()` call needs.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Where to look, what to mount under, and router options.
    pub settings: Settings,
    /// Explicit route definitions, registered after the other sources.
    pub routes: Option<Vec<RouteDefinition>>,
    /// The route modules files on disk map to.
    pub modules: ModuleTable,
}

impl Options {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_routes(mut self, routes: Vec<RouteDefinition>) -> Self {
        self.routes = Some(routes);
        self
    }

    #[must_use]
    pub fn with_modules(mut self, modules: ModuleTable) -> Self {
        self.modules = modules;
        self
    }
}

/// Assembles the route table described by `options`.
///
/// Installs the resulting [`Enrouten`] context on `app` and returns the
/// root router as one middleware. Nothing is installed if setup fails.
///
/// # Errors
///
/// Any configuration error from any source aborts the whole call: a missing
/// index module or route directory, a module that fails to register, an
/// invalid route definition, or a route name used twice.
pub fn enrouten(app: &mut App, options: Options) -> EnroutenResult<Middleware> {
    let Options {
        settings,
        routes,
        modules,
    } = options;

    let basedir = settings.resolved_basedir()?;
    let modules = modules.rebase(&basedir);
    let mut router = Router::new(settings.router);
    let mut names = NamedRoutes::new(settings.mountpath.as_deref().unwrap_or(""));

    if let Some(index) = &settings.index {
        tracing::debug!(index = %index.display(), "Resolving index");
        load_index(&mut router, &resolve(&basedir, index), &modules)?;
    }

    if let Some(directory) = &settings.directory {
        tracing::debug!(directory = %directory.display(), "Resolving directory");
        let mounted = bind_directory(&mut router, &mut names, &resolve(&basedir, directory), &modules)?;
        tracing::debug!(mounted, "Mounted route modules");
    }

    if let Some(routes) = &routes {
        tracing::debug!(count = routes.len(), "Resolving routes");
        load_routes(&mut router, routes)?;
    }

    // Names declared directly on the root router: the index module and
    // explicit definitions.
    for entry in router.routes() {
        if let Some(name) = &entry.name {
            names.register(name, &entry.path)?;
        }
    }

    tracing::info!(
        named_routes = names.len(),
        mountpath = names.mountpath(),
        "Route table assembled"
    );
    app.context_mut().enrouten = Some(Arc::new(Enrouten::new(names)));
    Ok(router.middleware())
}
