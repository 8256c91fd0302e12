use super::{ITEM_ADDED, ITEM_DELETED, ITEM_UPDATED};
use crate::domain::TodoId;
use crate::domain::standalone_todo::driven_ports::{StandaloneTodoReader, StandaloneTodoWriter};
use crate::domain::standalone_todo::driving_ports::{StandaloneTodoError, StandaloneTodoPort};
use crate::dto::standalone_todo::{NewStandaloneTodo, StandaloneTodo, StandaloneTodoPatch};
use crate::dto::{InsertedIdResponse, MessageResponse};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BasicErrorResponse, GenericErrorResponse, Json, NotFoundResponse, OutOfRangeResponse,
    ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, put};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(create_todo, get_todos, get_todo, update_todo, delete_todo))]
/// Defines the OpenAPI spec for todos stored as their own records
pub struct StandaloneTodoApi;

/// Used to group standalone todo endpoints together in the OpenAPI documentation
pub const STANDALONE_TODO_API_GROUP: &str = "Standalone Todos";

/// Adds routes for todos stored as top-level records
pub fn standalone_todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todo",
            put(
                |State(app_state): AppState, Json(new_todo): Json<NewStandaloneTodo>| async move {
                    let todo_service = domain::standalone_todo::StandaloneTodoService;
                    let todo_writer =
                        persistence::db_standalone_todo_driven_ports::DbStandaloneTodoWriter;

                    create_todo(new_todo, &app_state.ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
        .route(
            "/todos",
            get(|State(app_state): AppState| async move {
                let todo_service = domain::standalone_todo::StandaloneTodoService;
                let todo_reader = persistence::db_standalone_todo_driven_ports::DbStandaloneTodoReader;

                get_todos(&app_state.ext_cxn, &todo_service, &todo_reader).await
            }),
        )
        .route(
            "/todos/:id",
            get(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let todo_service = domain::standalone_todo::StandaloneTodoService;
                    let todo_reader =
                        persistence::db_standalone_todo_driven_ports::DbStandaloneTodoReader;

                    get_todo(todo_id, &app_state.ext_cxn, &todo_service, &todo_reader).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(todo_id): Path<String>,
                 Json(patch): Json<StandaloneTodoPatch>| async move {
                    let todo_service = domain::standalone_todo::StandaloneTodoService;
                    let todo_writer =
                        persistence::db_standalone_todo_driven_ports::DbStandaloneTodoWriter;

                    update_todo(
                        todo_id,
                        patch,
                        &app_state.ext_cxn,
                        &todo_service,
                        &todo_writer,
                    )
                    .await
                },
            )
            .delete(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let todo_service = domain::standalone_todo::StandaloneTodoService;
                    let todo_writer =
                        persistence::db_standalone_todo_driven_ports::DbStandaloneTodoWriter;

                    delete_todo(todo_id, &app_state.ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
}

fn standalone_error_response(err: StandaloneTodoError) -> ErrorResponse {
    match err {
        StandaloneTodoError::EmptyUpdate => {
            ValidationErrorResponse::missing_fields(&["new data"]).into()
        }
        StandaloneTodoError::TodoDoesNotExist => NotFoundResponse("todo item").into(),
        StandaloneTodoError::PortError(err) => GenericErrorResponse(err).into(),
    }
}

#[utoipa::path(
    put,
    path = "/todo",
    tag = STANDALONE_TODO_API_GROUP,
    request_body = NewStandaloneTodo,
    responses(
        (status = 201, description = "Todo stored under a generated id", body = InsertedIdResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Stores a new todo. Any fields beyond `uid` and `todo` are kept as sent.
async fn create_todo(
    new_todo: NewStandaloneTodo,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl StandaloneTodoPort,
    todo_writer: &impl StandaloneTodoWriter,
) -> Result<(StatusCode, Json<InsertedIdResponse>), ErrorResponse> {
    new_todo
        .validate()
        .map_err(ValidationErrorResponse::from)?;
    let oversized = dto::oversized_integer_paths(&new_todo.extra);
    if !oversized.is_empty() {
        return Err(OutOfRangeResponse(oversized).into());
    }

    let fields = Map::<String, Value>::from(new_todo);
    info!("Creating standalone todo for user {:?}", fields.get("uid"));
    let todo_id = todo_service
        .create_todo(&fields, ext_cxn, todo_writer)
        .await
        .map_err(standalone_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(InsertedIdResponse::new(ITEM_ADDED, todo_id)),
    ))
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = STANDALONE_TODO_API_GROUP,
    responses(
        (status = 200, description = "Every stored todo", body = Vec<StandaloneTodo>),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists every stored todo
async fn get_todos(
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl StandaloneTodoPort,
    todo_reader: &impl StandaloneTodoReader,
) -> Result<Json<Vec<StandaloneTodo>>, ErrorResponse> {
    info!("Listing standalone todos");
    let todos = todo_service
        .all_todos(ext_cxn, todo_reader)
        .await
        .map_err(standalone_error_response)?;

    Ok(Json(todos.into_iter().map(StandaloneTodo::from).collect()))
}

#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = STANDALONE_TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "Store-generated id of the todo"),
    ),
    responses(
        (status = 200, description = "The requested todo", body = StandaloneTodo),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves one todo by its id
async fn get_todo(
    todo_id: String,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl StandaloneTodoPort,
    todo_reader: &impl StandaloneTodoReader,
) -> Result<Json<StandaloneTodo>, ErrorResponse> {
    info!("Get standalone todo {todo_id}");
    let todo = todo_service
        .todo_by_id(&TodoId::from(todo_id), ext_cxn, todo_reader)
        .await
        .map_err(standalone_error_response)?;

    Ok(Json(todo.into()))
}

#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = STANDALONE_TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "Store-generated id of the todo"),
    ),
    request_body = StandaloneTodoPatch,
    responses(
        (status = 200, description = "Fields merged into the todo", body = MessageResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Merges the given fields into a todo. Fields left out of the body keep their values.
async fn update_todo(
    todo_id: String,
    patch: StandaloneTodoPatch,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl StandaloneTodoPort,
    todo_writer: &impl StandaloneTodoWriter,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    info!("Updating standalone todo {todo_id}");
    let oversized = dto::oversized_integer_paths(&patch.0);
    if !oversized.is_empty() {
        return Err(OutOfRangeResponse(oversized).into());
    }

    todo_service
        .update_todo(&TodoId::from(todo_id), &patch.0, ext_cxn, todo_writer)
        .await
        .map_err(standalone_error_response)?;

    Ok(Json(MessageResponse::new(ITEM_UPDATED)))
}

#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = STANDALONE_TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "Store-generated id of the todo"),
    ),
    responses(
        (status = 200, description = "Todo removed", body = MessageResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Removes a todo
async fn delete_todo(
    todo_id: String,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl StandaloneTodoPort,
    todo_writer: &impl StandaloneTodoWriter,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    info!("Deleting standalone todo {todo_id}");
    todo_service
        .delete_todo(&TodoId::from(todo_id), ext_cxn, todo_writer)
        .await
        .map_err(standalone_error_response)?;

    Ok(Json(MessageResponse::new(ITEM_DELETED)))
}
