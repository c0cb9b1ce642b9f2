//! In-process HTTP test client.
//!
//! [`TestClient`] sends requests straight into an `axum::Router` with
//! `tower::ServiceExt::oneshot`, so no socket is opened. [`TestResponse`]
//! holds the collected status, headers and body for assertions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use enrouten_test::client::TestClient;
//! use axum::Router;
//! use axum::routing::get;
//!
//! async fn example() {
//!     let app = Router::new().route("/hello", get(|| async { "Hello, World!" }));
//!     let client = TestClient::new(app);
//!
//!     let response = client.get("/hello").await;
//!     assert_eq!(response.status_code(), 200);
//!     assert_eq!(response.text(), "Hello, World!");
//! }
//! ```

use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Sends simulated requests to an Axum router.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    /// Sends a GET request to the given path.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path).await
    }

    /// Sends a POST request with a plain-text body.
    pub async fn post(&self, path: &str, body: impl Into<Body>) -> TestResponse {
        self.request_with_body(Method::POST, path, body.into()).await
    }

    /// Sends a PUT request with a plain-text body.
    pub async fn put(&self, path: &str, body: impl Into<Body>) -> TestResponse {
        self.request_with_body(Method::PUT, path, body.into()).await
    }

    /// Sends a PATCH request with a plain-text body.
    pub async fn patch(&self, path: &str, body: impl Into<Body>) -> TestResponse {
        self.request_with_body(Method::PATCH, path, body.into()).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path).await
    }

    pub async fn head(&self, path: &str) -> TestResponse {
        self.request(Method::HEAD, path).await
    }

    pub async fn options(&self, path: &str) -> TestResponse {
        self.request(Method::OPTIONS, path).await
    }

    /// Sends a request with any method and an empty body.
    pub async fn request(&self, method: Method, path: &str) -> TestResponse {
        self.request_with_body(method, path, Body::empty()).await
    }

    async fn request_with_body(&self, method: Method, path: &str, body: Body) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .expect("request builder should not fail");
        self.send(req).await
    }

    /// Sends a prepared request through the router.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("router should not error");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_or_else(|_| Bytes::new(), http_body_util::Collected::to_bytes);

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

/// The response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Returns the response body as a UTF-8 string.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Deserializes the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the value of a header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Returns `true` if the response body contains the given text.
    pub fn contains(&self, text: &str) -> bool {
        self.text().contains(text)
    }
}
