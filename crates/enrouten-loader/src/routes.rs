//! Explicit route definitions.
//!
//! Besides modules on disk, routes can be listed directly in configuration.
//! Each [`RouteDefinition`] registers exactly one route on the root router.

use std::fmt;

use enrouten_core::{EnroutenError, EnroutenResult};
use enrouten_http::middleware::{Handler, Middleware};
use enrouten_http::router::{parse_method, RouteSpec, Router};

/// One explicitly configured route.
///
/// `path` and `handler` are required; [`load_routes`] rejects a definition
/// without them. `method` defaults to `get`.
#[derive(Clone, Default)]
pub struct RouteDefinition {
    pub method: Option<String>,
    pub path: Option<String>,
    pub name: Option<String>,
    pub middleware: Option<Vec<Middleware>>,
    pub handler: Option<Handler>,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>, handler: Handler) -> Self {
        Self {
            path: Some(path.into()),
            handler: Some(handler),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn middleware(mut self, middleware: Vec<Middleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("middleware", &self.middleware.as_ref().map(Vec::len))
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Registers every definition on `router`, in order.
///
/// Returns the number of routes registered.
///
/// # Errors
///
/// Returns [`EnroutenError::MissingField`] for a definition without a path
/// or handler, [`EnroutenError::InvalidMethod`] for an unknown method, and
/// [`EnroutenError::InvalidPattern`] for a path that does not compile.
pub fn load_routes(router: &mut Router, definitions: &[RouteDefinition]) -> EnroutenResult<usize> {
    for definition in definitions {
        let path = definition
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(EnroutenError::MissingField("path"))?;
        let handler = definition
            .handler
            .clone()
            .ok_or(EnroutenError::MissingField("handler"))?;
        let method = parse_method(definition.method.as_deref().unwrap_or("get"))?;

        let mut spec = RouteSpec::new(method, path, handler)
            .middleware(definition.middleware.iter().flatten().cloned());
        spec.name.clone_from(&definition.name);
        router.add(spec)?;
    }
    Ok(definitions.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use enrouten_core::RouterOptions;
    use enrouten_http::middleware::{handler_fn, middleware_fn, Next, Request};
    use http::{Method, StatusCode};

    fn ok() -> Handler {
        handler_fn(|_req| async { "ok" })
    }

    async fn status(router: &Router, method: Method, uri: &str) -> StatusCode {
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        (router.middleware())(req, Next::not_found()).await.status()
    }

    #[tokio::test]
    async fn test_method_defaults_to_get() {
        let mut router = Router::new(RouterOptions::default());
        load_routes(&mut router, &[RouteDefinition::new("/", ok())]).unwrap();

        assert_eq!(router.routes()[0].method, Some(Method::GET));
        assert_eq!(status(&router, Method::GET, "/").await, StatusCode::OK);
        assert_eq!(status(&router, Method::POST, "/").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_is_case_insensitive() {
        let mut router = Router::new(RouterOptions::default());
        let definitions = [
            RouteDefinition::new("/", ok()).method("POST"),
            RouteDefinition::new("/", ok()).method("Delete"),
        ];
        assert_eq!(load_routes(&mut router, &definitions).unwrap(), 2);
        assert_eq!(status(&router, Method::POST, "/").await, StatusCode::OK);
        assert_eq!(status(&router, Method::DELETE, "/").await, StatusCode::OK);
        assert_eq!(status(&router, Method::GET, "/").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_middleware_runs_in_order() {
        let mark = |tag: &'static str| {
            middleware_fn(move |req: Request, next: Next| async move {
                let mut response = next.run(req).await;
                response
                    .headers_mut()
                    .append("x-order", http::HeaderValue::from_static(tag));
                response
            })
        };
        let mut router = Router::new(RouterOptions::default());
        let definition = RouteDefinition::new("/", ok()).middleware(vec![mark("first"), mark("second")]);
        load_routes(&mut router, &[definition]).unwrap();

        let req = http::Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = (router.middleware())(req, Next::not_found()).await;
        let order: Vec<_> = response
            .headers()
            .get_all("x-order")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        // Innermost appends first on the way out.
        assert_eq!(order, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_middleware_can_fail_request() {
        let fail = middleware_fn(|_req, _next| async { (StatusCode::INTERNAL_SERVER_ERROR, "nope") });
        let mut router = Router::new(RouterOptions::default());
        load_routes(&mut router, &[RouteDefinition::new("/", ok()).middleware(vec![fail])]).unwrap();
        assert_eq!(
            status(&router, Method::GET, "/").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_names_are_recorded() {
        let mut router = Router::new(RouterOptions::default());
        load_routes(&mut router, &[RouteDefinition::new("/x", ok()).name("x")]).unwrap();
        assert_eq!(router.routes()[0].name.as_deref(), Some("x"));
    }

    #[test]
    fn test_missing_path() {
        let mut router = Router::new(RouterOptions::default());
        let definition = RouteDefinition {
            handler: Some(ok()),
            ..RouteDefinition::default()
        };
        let err = load_routes(&mut router, &[definition]).unwrap_err();
        assert_eq!(err.to_string(), "path is required");

        let definition = RouteDefinition {
            path: Some(String::new()),
            handler: Some(ok()),
            ..RouteDefinition::default()
        };
        assert!(matches!(
            load_routes(&mut router, &[definition]),
            Err(EnroutenError::MissingField("path"))
        ));
    }

    #[test]
    fn test_missing_handler() {
        let mut router = Router::new(RouterOptions::default());
        let definition = RouteDefinition {
            path: Some("/".into()),
            ..RouteDefinition::default()
        };
        let err = load_routes(&mut router, &[definition]).unwrap_err();
        assert_eq!(err.to_string(), "handler is required");
    }

    #[test]
    fn test_unknown_method() {
        let mut router = Router::new(RouterOptions::default());
        let definition = RouteDefinition::new("/", ok()).method("fetch");
        assert!(matches!(
            load_routes(&mut router, &[definition]),
            Err(EnroutenError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_empty_list_is_noop() {
        let mut router = Router::new(RouterOptions::default());
        assert_eq!(load_routes(&mut router, &[]).unwrap(), 0);
        assert!(router.routes().is_empty());
    }
}
