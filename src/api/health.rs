use crate::SharedData;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(running))]
/// Defines the OpenAPI spec for the liveness endpoint
pub struct HealthApi;

pub const HEALTH_API_GROUP: &str = "Health";

const RUNNING_MESSAGE: &str = "Todo App is Running...";

pub fn health_routes() -> Router<Arc<SharedData>> {
    Router::new().route("/", get(running))
}

#[utoipa::path(
    get,
    path = "/",
    tag = HEALTH_API_GROUP,
    responses(
        (status = 200, description = "The server is up", body = String, example = json!("Todo App is Running...")),
    ),
)]
/// Lets load balancers and humans check that the server is up
async fn running() -> &'static str {
    RUNNING_MESSAGE
}
