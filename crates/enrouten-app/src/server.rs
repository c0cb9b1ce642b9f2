//! The application host.
//!
//! [`App`] owns an ordered middleware stack, the shared [`AppContext`] that
//! setup installs the [`Enrouten`] context into, and the [`Settings`] it was
//! created with. It converts into an `axum::Router` that sends every request
//! through the stack, or serves itself directly on a TCP address.
//!
//! # Examples
//!
//! ```no_run
//! use enrouten_app::server::App;
//! use enrouten_core::Settings;
//! use enrouten_http::middleware::middleware_fn;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = App::new(Settings::default());
//! app.use_middleware(middleware_fn(|_req, _next| async { "Hello!" }));
//!
//! // app.serve().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::extract::Request;
use axum::routing::any;
use tracing::Instrument;

use enrouten_core::logging::request_span;
use enrouten_core::{EnroutenError, EnroutenResult, Settings};
use enrouten_http::middleware::{compose, Middleware, Next};
use enrouten_http::router::mount_middleware;

use crate::context::Enrouten;

/// State shared between the application and its request handlers.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Installed by [`enrouten()`](crate::setup::enrouten).
    pub enrouten: Option<Arc<Enrouten>>,
}

/// An application: a middleware stack plus shared context.
pub struct App {
    settings: Settings,
    middleware: Vec<Middleware>,
    context: AppContext,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            middleware: Vec::new(),
            context: AppContext::default(),
        }
    }

    /// Returns a reference to the application settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Appends a middleware to the stack.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a middleware that only sees requests under `prefix`, with the
    /// prefix stripped from their path.
    pub fn mount(&mut self, prefix: &str, middleware: Middleware) -> &mut Self {
        let mounted = mount_middleware(prefix, middleware, self.settings.router);
        self.use_middleware(mounted)
    }

    /// Returns the number of middleware in the stack.
    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.context
    }

    /// Converts the application into an Axum router.
    ///
    /// Every request runs through the middleware stack in order and gets
    /// `404 Not Found` if nothing answers it. The installed
    /// [`Enrouten`] context, if any, is available to handlers as an
    /// `Arc<Enrouten>` request extension.
    pub fn into_axum_router(self) -> axum::Router {
        let chain = compose(&self.middleware, Next::not_found());
        let enrouten = self.context.enrouten;

        let handler = move |mut req: Request| {
            let chain = chain.clone();
            let enrouten = enrouten.clone();
            let span = request_span(req.method().as_str(), req.uri().path());

            async move {
                if let Some(enrouten) = enrouten {
                    req.extensions_mut().insert(enrouten);
                }
                chain.run(req).await
            }
            .instrument(span)
        };

        axum::Router::new()
            .route("/{*path}", any(handler.clone()))
            .route("/", any(handler))
    }

    /// Runs the application as an HTTP server on the given address.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the address or
    /// encounters a runtime error.
    pub async fn run(self, addr: &str) -> EnroutenResult<()> {
        let router = self.into_axum_router();
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            EnroutenError::ImproperlyConfigured(format!("Failed to bind to {addr}: {e}"))
        })?;

        tracing::info!("Starting server at http://{addr}/");

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Runs the application on the address configured in
    /// [`Settings::bind_address`].
    ///
    /// # Errors
    ///
    /// Same as [`App::run`].
    pub async fn serve(self) -> EnroutenResult<()> {
        let addr = self.settings.bind_address.clone();
        self.run(&addr).await
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("settings", &self.settings)
            .field("middleware", &self.middleware.len())
            .field("context", &self.context)
            .finish()
    }
}
