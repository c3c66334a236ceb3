use axum::{Router, http::Method, middleware};
use std::any::Any;
use std::error::Error;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::AuthGuard;
use crate::handler::AppState;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod model;
pub mod routes;
pub mod store;

/// The bookmarks API with its full middleware stack.
pub fn app(state: AppState, guard: AuthGuard) -> Router {
    with_middleware(routes::routes(), state, guard)
}

/// Wraps `routes` in access logging, CORS, panic recovery and the bearer
/// token check, outermost first.
pub fn with_middleware(routes: Router<AppState>, state: AppState, guard: AuthGuard) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(cors::Any);

    let errors = state.errors;
    // Production logs method, uri and status; other modes add headers.
    let verbose = !state.mode.is_production();
    let access_log = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(verbose))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(verbose));

    routes
        .layer(middleware::from_fn_with_state(guard, auth::require_bearer_token))
        .layer(CatchPanicLayer::custom(
            move |payload: Box<dyn Any + Send + 'static>| errors.respond_to_panic(payload),
        ))
        .layer(cors)
        .layer(access_log)
        .with_state(state)
}

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
