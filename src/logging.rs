use crate::app_env;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, field, info_span};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// Attaches a tracing middleware layer to the given router. Every request gets a span with its
/// method, path and eventually the response status.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    info_span!(
                        "request",
                        method = request.method().as_str(),
                        path = request.uri().path(),
                        response_status = field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<Body>, latency: Duration, span: &Span| {
                        span.record("response_status", field::display(response.status()));
                        debug!(latency_ms = latency.as_millis(), "request processing complete");
                    },
                ),
        ),
    )
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default, and also when the variable can't be parsed.
pub fn init_env_filter() -> EnvFilter {
    let builder = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL);

    builder.from_env().unwrap_or_else(|err| {
        eprintln!("{} could not be parsed, logging at info: {err}", app_env::LOG_LEVEL);
        EnvFilter::new(LevelFilter::INFO.to_string())
    })
}

/// Sets up the global logging sink: JSON lines on stdout, filtered by [env_filter]. Though the
/// logger is set up with the "tracing" crate, it also bridges libraries still using "log".
pub fn setup_logging(env_filter: EnvFilter) {
    registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_filter(env_filter),
        )
        .init();
}
