//! Middleware chain primitives.
//!
//! A [`Middleware`] receives the request and a [`Next`] continuation. It may
//! answer the request itself, or call `next.run(request)` to hand it further
//! down the chain and then post-process the response ("onion" model). A
//! [`Handler`] is the terminal step of a route and has no continuation.
//!
//! Both are reference-counted trait objects so composed chains can be shared
//! across requests and threads without copying.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::response::IntoResponse;
use http::StatusCode;

/// The request type flowing through the chain.
pub type Request = axum::extract::Request;

/// The response type flowing back through the chain.
pub type Response = axum::response::Response;

/// A boxed, sendable response future.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// The terminal handler of a route.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture + Send + Sync>;

/// A middleware function: the request plus the rest of the chain.
pub type Middleware = Arc<dyn Fn(Request, Next) -> BoxFuture + Send + Sync>;

/// The remainder of a middleware chain.
///
/// `Next` is cheap to clone; running it consumes the clone.
#[derive(Clone)]
pub struct Next {
    inner: Arc<dyn Fn(Request) -> BoxFuture + Send + Sync>,
}

impl Next {
    /// Wraps a continuation function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Request) -> BoxFuture + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// A continuation that always answers `404 Not Found`.
    ///
    /// Used as the end of the outermost chain.
    pub fn not_found() -> Self {
        Self::new(|_req| Box::pin(async { StatusCode::NOT_FOUND.into_response() }))
    }

    /// A continuation that ends in the given handler.
    pub fn from_handler(handler: Handler) -> Self {
        Self::new(move |req| handler(req))
    }

    /// Runs the rest of the chain.
    pub fn run(self, req: Request) -> BoxFuture {
        (self.inner)(req)
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Wraps an async function as a [`Handler`].
///
/// # Examples
///
/// ```
/// use enrouten_http::middleware::handler_fn;
///
/// let handler = handler_fn(|_req| async { "ok" });
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req| {
        let fut = f(req);
        Box::pin(async move { fut.await.into_response() })
    })
}

/// Wraps an async function as a [`Middleware`].
///
/// # Examples
///
/// ```
/// use enrouten_http::middleware::middleware_fn;
///
/// let mw = middleware_fn(|req, next| async move {
///     let mut response = next.run(req).await;
///     response.headers_mut().insert("x-powered-by", "enrouten".parse().unwrap());
///     response
/// });
/// ```
pub fn middleware_fn<F, Fut, R>(f: F) -> Middleware
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req, next| {
        let fut = f(req, next);
        Box::pin(async move { fut.await.into_response() })
    })
}

/// Composes a middleware stack in front of `endpoint`.
///
/// The first middleware in the slice sees the request first.
pub fn compose(stack: &[Middleware], endpoint: Next) -> Next {
    chain(Arc::from(stack.to_vec()), 0, endpoint)
}

fn chain(stack: Arc<[Middleware]>, index: usize, endpoint: Next) -> Next {
    if index >= stack.len() {
        return endpoint;
    }
    Next::new(move |req| {
        let next = chain(Arc::clone(&stack), index + 1, endpoint.clone());
        (stack[index])(req, next)
    })
}
