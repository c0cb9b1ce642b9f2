//! The route table handler modules declare their routes on.
//!
//! A [`Router`] is an ordered list of layers: routes, path-scoped middleware
//! and mounted sub-routers. [`Router::middleware`] turns that list into one
//! [`Middleware`] that walks the layers in registration order for each
//! request. The first route whose method and path match answers the request;
//! if nothing does, the request continues down the outer chain.
//!
//! # Examples
//!
//! ```
//! use enrouten_core::RouterOptions;
//! use enrouten_http::middleware::handler_fn;
//! use enrouten_http::router::Router;
//!
//! let mut router = Router::new(RouterOptions::default());
//! router.named("my-list").get("/list", handler_fn(|_req| async { "list" })).unwrap();
//! router.post("/list", handler_fn(|_req| async { "created" })).unwrap();
//!
//! assert_eq!(router.routes().len(), 2);
//! assert_eq!(router.routes()[0].name.as_deref(), Some("my-list"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::uri::{PathAndQuery, Uri};
use http::Method;
use percent_encoding::percent_decode_str;
use regex::Regex;

use enrouten_core::{EnroutenError, EnroutenResult, RouterOptions};

use crate::middleware::{compose, BoxFuture, Handler, Middleware, Next, Request};
use crate::urls::template::PathTemplate;

// ── Public route descriptions ───────────────────────────────────────

/// A registered route as seen from outside the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// The route name, if one was given.
    pub name: Option<String>,
    /// The HTTP method, or `None` for a route that answers every method.
    pub method: Option<Method>,
    /// The path template as declared.
    pub path: String,
}

/// Everything needed to register one route.
#[derive(Clone)]
pub struct RouteSpec {
    pub method: Option<Method>,
    pub path: String,
    pub name: Option<String>,
    pub middleware: Vec<Middleware>,
    pub handler: Handler,
}

impl RouteSpec {
    /// A route with no name and no middleware.
    pub fn new(method: Option<Method>, path: impl Into<String>, handler: Handler) -> Self {
        Self {
            method,
            path: path.into(),
            name: None,
            middleware: Vec::new(),
            handler,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends route-level middleware, run before the handler.
    #[must_use]
    pub fn middleware(mut self, middleware: impl IntoIterator<Item = Middleware>) -> Self {
        self.middleware.extend(middleware);
        self
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Path parameters captured for the matched route, percent-decoded.
///
/// Inserted into the request extensions before the route's middleware runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(pub HashMap<String, String>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses a method name as accepted in route definitions.
///
/// Case-insensitive. `"all"` means every method and yields `None`.
///
/// # Errors
///
/// Returns [`EnroutenError::InvalidMethod`] for anything else.
pub fn parse_method(method: &str) -> EnroutenResult<Option<Method>> {
    let method = match method.to_ascii_lowercase().as_str() {
        "get" => Method::GET,
        "post" => Method::POST,
        "put" => Method::PUT,
        "patch" => Method::PATCH,
        "delete" => Method::DELETE,
        "head" => Method::HEAD,
        "options" => Method::OPTIONS,
        "all" => return Ok(None),
        _ => return Err(EnroutenError::InvalidMethod(method.to_string())),
    };
    Ok(Some(method))
}

// ── Layers ──────────────────────────────────────────────────────────

struct Route {
    method: Option<Method>,
    matcher: Regex,
    params: Vec<String>,
    middleware: Vec<Middleware>,
    handler: Handler,
}

impl Route {
    fn matches(&self, method: &Method, path: &str) -> Option<RouteParams> {
        let method_ok = match &self.method {
            None => true,
            Some(m) => m == method || (*m == Method::GET && *method == Method::HEAD),
        };
        if !method_ok {
            return None;
        }
        let captures = self.matcher.captures(path)?;
        let params = self
            .params
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, value)| {
                let value = percent_decode_str(value?.as_str()).decode_utf8_lossy();
                Some((name.clone(), value.into_owned()))
            })
            .collect();
        Some(RouteParams(params))
    }
}

#[derive(Clone)]
enum Layer {
    Route(Arc<Route>),
    Use {
        prefix: Option<String>,
        middleware: Middleware,
    },
}

// ── Router ──────────────────────────────────────────────────────────

/// An ordered table of routes and middleware.
pub struct Router {
    options: RouterOptions,
    layers: Vec<Layer>,
    entries: Vec<RouteEntry>,
}

macro_rules! router_verbs {
    ($($(#[$doc:meta])* $fn:ident => $method:expr;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns [`EnroutenError::InvalidPattern`] if `path` is not a
            /// valid route path.
            pub fn $fn(&mut self, path: &str, handler: Handler) -> EnroutenResult<&mut Self> {
                self.add(RouteSpec::new($method, path, handler))
            }
        )*
    };
}

macro_rules! builder_verbs {
    ($($fn:ident => $method:expr;)*) => {
        $(
            /// Registers the route with the accumulated name and middleware.
            ///
            /// # Errors
            ///
            /// Returns [`EnroutenError::InvalidPattern`] if `path` is not a
            /// valid route path.
            pub fn $fn(self, path: &str, handler: Handler) -> EnroutenResult<&'r mut Router> {
                self.route($method, path, handler)
            }
        )*
    };
}

impl Router {
    pub fn new(options: RouterOptions) -> Self {
        Self {
            options,
            layers: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// The matching options routes on this router are compiled with.
    pub fn router_options(&self) -> RouterOptions {
        self.options
    }

    /// The routes registered directly on this router, in order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Registers a route.
    ///
    /// # Errors
    ///
    /// Returns [`EnroutenError::InvalidPattern`] if the path does not compile.
    pub fn add(&mut self, spec: RouteSpec) -> EnroutenResult<&mut Self> {
        let template = PathTemplate::parse(&spec.path);
        let matcher = template.matcher(self.options)?;
        let params = template.param_names().into_iter().map(String::from).collect();
        let name = spec.name.filter(|n| !n.is_empty());

        tracing::debug!(
            method = spec.method.as_ref().map_or("ALL", Method::as_str),
            path = %spec.path,
            name = name.as_deref().unwrap_or(""),
            "Registered route"
        );

        self.layers.push(Layer::Route(Arc::new(Route {
            method: spec.method.clone(),
            matcher,
            params,
            middleware: spec.middleware,
            handler: spec.handler,
        })));
        self.entries.push(RouteEntry {
            name,
            method: spec.method,
            path: spec.path,
        });
        Ok(self)
    }

    router_verbs! {
        /// Registers a `GET` route. It also answers `HEAD`.
        get => Some(Method::GET);
        /// Registers a `POST` route.
        post => Some(Method::POST);
        /// Registers a `PUT` route.
        put => Some(Method::PUT);
        /// Registers a `PATCH` route.
        patch => Some(Method::PATCH);
        /// Registers a `DELETE` route.
        delete => Some(Method::DELETE);
        /// Registers a `HEAD` route.
        head => Some(Method::HEAD);
        /// Registers an `OPTIONS` route.
        options => Some(Method::OPTIONS);
        /// Registers a route answering every method.
        all => None;
    }

    /// Starts a route declaration carrying `name`.
    pub fn named(&mut self, name: impl Into<String>) -> RouteBuilder<'_> {
        RouteBuilder::new(self).named(name)
    }

    /// Starts a route declaration with route-level middleware.
    pub fn with(&mut self, middleware: Middleware) -> RouteBuilder<'_> {
        RouteBuilder::new(self).with(middleware)
    }

    /// Runs `middleware` for every request that reaches this point.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.layers.push(Layer::Use {
            prefix: None,
            middleware,
        });
        self
    }

    /// Runs `middleware` for requests under `prefix`, leaving the path as is.
    pub fn use_at(&mut self, prefix: &str, middleware: Middleware) -> &mut Self {
        self.layers.push(Layer::Use {
            prefix: Some(normalize_prefix(prefix)),
            middleware,
        });
        self
    }

    /// Mounts `middleware` under `prefix`.
    ///
    /// Requests under `prefix` reach `middleware` with the prefix stripped
    /// from their path. If it passes the request on, the original path is
    /// restored first.
    pub fn mount(&mut self, prefix: &str, middleware: Middleware) -> &mut Self {
        tracing::debug!(prefix, "Mounted middleware");
        self.use_middleware(mount_middleware(prefix, middleware, self.options))
    }

    /// Composes the whole router into a single middleware.
    ///
    /// The result is a snapshot: layers added afterwards are not seen by it.
    pub fn middleware(&self) -> Middleware {
        let layers: Arc<[Layer]> = Arc::from(self.layers.clone());
        let options = self.options;
        Arc::new(move |req: Request, next: Next| {
            dispatch(Arc::clone(&layers), options, 0, req, next)
        })
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("layers", &self.layers.len())
            .field("routes", &self.entries)
            .finish()
    }
}

/// Accumulates a name and route-level middleware before the verb call.
pub struct RouteBuilder<'r> {
    router: &'r mut Router,
    name: Option<String>,
    middleware: Vec<Middleware>,
}

impl<'r> RouteBuilder<'r> {
    fn new(router: &'r mut Router) -> Self {
        Self {
            router,
            name: None,
            middleware: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    builder_verbs! {
        get => Some(Method::GET);
        post => Some(Method::POST);
        put => Some(Method::PUT);
        patch => Some(Method::PATCH);
        delete => Some(Method::DELETE);
        head => Some(Method::HEAD);
        options => Some(Method::OPTIONS);
        all => None;
    }

    fn route(
        self,
        method: Option<Method>,
        path: &str,
        handler: Handler,
    ) -> EnroutenResult<&'r mut Router> {
        let mut spec = RouteSpec::new(method, path, handler).middleware(self.middleware);
        spec.name = self.name;
        self.router.add(spec)
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

fn dispatch(
    layers: Arc<[Layer]>,
    options: RouterOptions,
    start: usize,
    mut req: Request,
    done: Next,
) -> BoxFuture {
    for index in start..layers.len() {
        match &layers[index] {
            Layer::Route(route) => {
                if let Some(params) = route.matches(req.method(), req.uri().path()) {
                    req.extensions_mut().insert(params);
                    let endpoint = Next::from_handler(Arc::clone(&route.handler));
                    return compose(&route.middleware, endpoint).run(req);
                }
            }
            Layer::Use { prefix, middleware } => {
                let applies = prefix
                    .as_deref()
                    .map_or(true, |p| strip_prefix(req.uri().path(), p, options).is_some());
                if applies {
                    let middleware = Arc::clone(middleware);
                    let layers = Arc::clone(&layers);
                    let rest = Next::new(move |req| {
                        dispatch(Arc::clone(&layers), options, index + 1, req, done.clone())
                    });
                    return middleware(req, rest);
                }
            }
        }
    }
    done.run(req)
}

/// Wraps `inner` so it only sees requests under `prefix`, with the prefix
/// stripped from the path.
pub fn mount_middleware(prefix: &str, inner: Middleware, options: RouterOptions) -> Middleware {
    let prefix = normalize_prefix(prefix);
    Arc::new(move |mut req: Request, next: Next| {
        let original = req.uri().clone();
        let Some(rest) = strip_prefix(original.path(), &prefix, options) else {
            return next.run(req);
        };
        let rest = if rest.is_empty() { "/" } else { rest };
        let Some(rewritten) = with_path(&original, rest) else {
            return next.run(req);
        };
        *req.uri_mut() = rewritten;

        let restore = Next::new(move |mut req| {
            *req.uri_mut() = original.clone();
            next.clone().run(req)
        });
        inner(req, restore)
    })
}

/// Strips one trailing slash; `/` becomes the empty prefix.
fn normalize_prefix(prefix: &str) -> String {
    prefix.strip_suffix('/').unwrap_or(prefix).to_string()
}

/// Returns the remainder of `path` if it lies under `prefix`: equal to it,
/// or continuing with `/` after it.
fn strip_prefix<'a>(path: &'a str, prefix: &str, options: RouterOptions) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    let matched = if options.case_sensitive {
        head == prefix
    } else {
        head.eq_ignore_ascii_case(prefix)
    };
    if !matched {
        return None;
    }
    let rest = &path[prefix.len()..];
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
