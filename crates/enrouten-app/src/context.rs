//! The context installed on the application by setup.
//!
//! [`Enrouten`] carries the finished named-route table. It lives in the
//! application's [`AppContext`](crate::server::AppContext) and is handed to
//! every request as an `Arc<Enrouten>` extension, so handlers can build URLs
//! without reaching for global state.

use std::collections::BTreeMap;
use std::sync::Arc;

use enrouten_http::middleware::Request;
use enrouten_http::urls::registry::NamedRoutes;
use enrouten_http::urls::reverse::{reverse, UrlParams};

use crate::server::App;

/// Named routes plus reverse URL generation for one setup call.
#[derive(Debug, Clone)]
pub struct Enrouten {
    routes: NamedRoutes,
}

impl Enrouten {
    pub fn new(routes: NamedRoutes) -> Self {
        Self { routes }
    }

    /// The named-route table.
    pub fn routes(&self) -> &NamedRoutes {
        &self.routes
    }

    /// The table as plain `name → path` strings.
    pub fn route_map(&self) -> BTreeMap<String, String> {
        self.routes.to_map()
    }

    /// The normalized mount path the table was built for.
    pub fn mountpath(&self) -> &str {
        self.routes.mountpath()
    }

    /// Builds the URL for the route named `name`, or `None` if there is no
    /// such route. See [`UrlParams`] for what `params` accepts.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrouten_app::Enrouten;
    /// use enrouten_http::NamedRoutes;
    ///
    /// let mut routes = NamedRoutes::new("/foo");
    /// routes.register("my-bar", "/bar/:id/:action").unwrap();
    /// let enrouten = Enrouten::new(routes);
    ///
    /// assert_eq!(enrouten.url("my-bar", ["abc", "efg"]).as_deref(), Some("/foo/bar/abc/efg"));
    /// assert_eq!(enrouten.url("missing", ()), None);
    /// ```
    pub fn url(&self, name: &str, params: impl Into<UrlParams>) -> Option<String> {
        reverse(&self.routes, name, params)
    }

    /// Returns the context attached to `req`, if the application has one.
    pub fn from_request(req: &Request) -> Option<Arc<Self>> {
        req.extensions().get::<Arc<Self>>().cloned()
    }
}

/// Builds a URL through the context installed on `app`.
///
/// Returns `None` if setup has not installed a context yet, or if there is no
/// route named `name`.
pub fn url(app: &App, name: &str, params: impl Into<UrlParams>) -> Option<String> {
    app.context().enrouten.as_ref()?.url(name, params)
}
