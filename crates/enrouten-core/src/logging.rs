//! Logging integration for enrouten-rs.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-request spans.
//! Setup itself logs under the `enrouten_*` targets: discovery and name
//! registration at `debug`, the assembled table summary at `info`.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise structured JSON. Installing a
/// subscriber twice is not an error: the second call is ignored.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for an HTTP request.
///
/// # Examples
///
/// ```
/// use enrouten_core::logging::request_span;
///
/// let span = request_span("GET", "/users/42");
/// let _guard = span.enter();
/// tracing::info!("handling request");
/// ```
pub fn request_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("request", method = method, path = path)
}
