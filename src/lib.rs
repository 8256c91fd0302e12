use crate::app_env::TodoStorage;
use axum::Router;
use axum::extract::State;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod app_env;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;

#[cfg(test)]
mod integration_test;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor handlers use to reach [SharedData]
pub type AppState = State<Arc<SharedData>>;

/// Assembles the full HTTP surface for the given storage model: the liveness check, user
/// routes, the todo routes of that model and the swagger UI.
pub fn build_router(storage: TodoStorage, shared_data: Arc<SharedData>) -> Router {
    let todo_routes = match storage {
        TodoStorage::Embedded => api::todo::todo_routes(),
        TodoStorage::Standalone => api::standalone_todo::standalone_todo_routes(),
    };

    let router = Router::new()
        .merge(api::health::health_routes())
        .merge(api::user::user_routes())
        .merge(todo_routes)
        .merge(api::swagger_main::build_documentation(storage))
        .layer(CorsLayer::permissive());

    logging::attach_tracing_http(router).with_state(shared_data)
}
