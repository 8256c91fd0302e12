use crate::app_env::TodoStorage;
use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Todo API",
    description = "Keeps per-user todo lists in MongoDB"
))]
struct TodoAppApi;

/// Builds the combined OpenAPI document for the given storage model
pub fn api_documentation(storage: TodoStorage) -> utoipa::openapi::OpenApi {
    let mut api_docs = TodoAppApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::health::HealthApi::openapi());
    api_docs.merge(super::user::UsersApi::openapi());

    match storage {
        TodoStorage::Embedded => api_docs.merge(super::todo::TodoApi::openapi()),
        TodoStorage::Standalone => {
            api_docs.merge(super::standalone_todo::StandaloneTodoApi::openapi())
        }
    }

    api_docs
}

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Only the routes of the active storage model are documented.
pub fn build_documentation(storage: TodoStorage) -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_documentation(storage))
}
