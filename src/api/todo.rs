use super::{ITEM_ADDED, ITEM_DELETED, ITEM_UPDATED};
use crate::domain::TodoId;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::domain::user::driven_ports::DetectUser;
use crate::dto::todo::{AddTodo, OwnedTodoPath, Todo, TodoLookupQuery, TodoSelector, UpdateTodo};
use crate::dto::{InsertedIdResponse, MessageResponse};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BasicErrorResponse, ConflictResponse, GenericErrorResponse, Json, NotFoundResponse,
    OptionalJson, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, put};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(
    add_todo,
    get_todos,
    delete_todo,
    get_todo,
    update_todo,
    missing_todo_owner
))]
/// Defines the OpenAPI spec for todos embedded in user documents
pub struct TodoApi;

/// Used to group todo endpoints together in the OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Adds routes for todo items kept inside their owner's user document
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todo",
            put(
                |State(app_state): AppState, Json(add_request): Json<AddTodo>| async move {
                    let todo_service = domain::todo::TodoService;
                    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    add_todo(
                        add_request,
                        &app_state.ext_cxn,
                        &todo_service,
                        &user_detect,
                        &todo_writer,
                    )
                    .await
                },
            )
            .get(
                |State(app_state): AppState, Query(lookup): Query<TodoLookupQuery>| async move {
                    let todo_service = domain::todo::TodoService;
                    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                    get_todo(lookup, &app_state.ext_cxn, &todo_service, &todo_reader).await
                },
            ),
        )
        .route(
            "/todos/",
            get(missing_todo_owner)
                .delete(missing_todo_owner)
                .put(missing_todo_owner),
        )
        .route(
            "/todos/:uid",
            get(
                |State(app_state): AppState, Path(uid): Path<String>| async move {
                    let todo_service = domain::todo::TodoService;
                    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                    get_todos(uid, &app_state.ext_cxn, &todo_service, &todo_reader).await
                },
            )
            .delete(
                |State(app_state): AppState,
                 Path(uid): Path<String>,
                 OptionalJson(selector): OptionalJson<TodoSelector>| async move {
                    let todo_service = domain::todo::TodoService;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    delete_todo(
                        uid,
                        selector,
                        &app_state.ext_cxn,
                        &todo_service,
                        &todo_writer,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todos/:id/:uid",
            put(
                |State(app_state): AppState,
                 Path(path): Path<OwnedTodoPath>,
                 Json(update): Json<UpdateTodo>| async move {
                    let todo_service = domain::todo::TodoService;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    update_todo(
                        path,
                        update,
                        &app_state.ext_cxn,
                        &todo_service,
                        &todo_writer,
                    )
                    .await
                },
            ),
        )
}

fn todo_error_response(err: TodoError) -> ErrorResponse {
    match err {
        TodoError::UserDoesNotExist => NotFoundResponse("user").into(),
        TodoError::TodoDoesNotExist => NotFoundResponse("todo item").into(),
        TodoError::DuplicateTodoId(todo_id) => ConflictResponse(format!(
            "The user already has a todo item with id \"{todo_id}\"."
        ))
        .into(),
        TodoError::PortError(err) => GenericErrorResponse(err).into(),
    }
}

#[utoipa::path(
    put,
    path = "/todo",
    tag = TODO_API_GROUP,
    request_body = AddTodo,
    responses(
        (status = 201, description = "Todo item appended to the user's list", body = InsertedIdResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 409, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Appends a todo item to a user's list
async fn add_todo(
    add_request: AddTodo,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    user_detect: &impl DetectUser,
    todo_writer: &impl TodoWriter,
) -> Result<(StatusCode, Json<InsertedIdResponse>), ErrorResponse> {
    add_request
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let uid = add_request.uid.unwrap_or_default();
    let Some(todo_data) = add_request.todo_data else {
        return Err(ValidationErrorResponse::missing_fields(&["todoData"]).into());
    };
    info!("Adding todo item for user {uid}");

    let new_todo = domain::todo::NewTodo::from(todo_data);
    let todo_id = todo_service
        .add_todo_for_user(&uid, &new_todo, ext_cxn, user_detect, todo_writer)
        .await
        .map_err(todo_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(InsertedIdResponse::new(ITEM_ADDED, todo_id)),
    ))
}

#[utoipa::path(
    get,
    path = "/todos/{uid}",
    tag = TODO_API_GROUP,
    params(
        ("uid" = String, Path, description = "Owner of the todo list"),
    ),
    responses(
        (status = 200, description = "The user's todo items in order", body = Vec<Todo>),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists every todo item of a user
async fn get_todos(
    uid: String,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Json<Vec<Todo>>, ErrorResponse> {
    info!("Listing todo items for user {uid}");
    if dto::not_blank(&uid).is_err() {
        return Err(ValidationErrorResponse::missing_fields(&["uid"]).into());
    }

    let todos = todo_service
        .todos_for_user(&uid, ext_cxn, todo_reader)
        .await
        .map_err(todo_error_response)?;

    Ok(Json(todos.into_iter().map(Todo::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/todos/{uid}",
    tag = TODO_API_GROUP,
    params(
        ("uid" = String, Path, description = "Owner of the todo item"),
    ),
    request_body(
        content = String,
        description = "The id of the todo item, either as a bare JSON string or as `{\"id\": ...}`",
    ),
    responses(
        (status = 200, description = "Every todo item with the id is gone. Unknown ids are a no-op.", body = MessageResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Removes a todo item from a user's list
async fn delete_todo(
    uid: String,
    selector: Option<TodoSelector>,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    let uid_missing = dto::not_blank(&uid).is_err();
    let todo_id = selector.and_then(TodoSelector::todo_id);
    match (uid_missing, todo_id) {
        (true, None) => Err(ValidationErrorResponse::missing_fields(&["uid", "id"]).into()),
        (true, Some(_)) => Err(ValidationErrorResponse::missing_fields(&["uid"]).into()),
        (false, None) => Err(ValidationErrorResponse::missing_fields(&["id"]).into()),
        (false, Some(todo_id)) => {
            info!("Deleting todo item {todo_id} of user {uid}");
            let removed = todo_service
                .delete_todo(&uid, &todo_id, ext_cxn, todo_writer)
                .await
                .map_err(todo_error_response)?;
            if !removed {
                info!("User {uid} had no todo item {todo_id} to delete");
            }

            Ok(Json(MessageResponse::new(ITEM_DELETED)))
        }
    }
}

#[utoipa::path(
    get,
    path = "/todo",
    tag = TODO_API_GROUP,
    params(TodoLookupQuery),
    responses(
        (status = 200, description = "The requested todo item", body = Todo),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a single todo item of a user
async fn get_todo(
    lookup: TodoLookupQuery,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Json<Todo>, ErrorResponse> {
    lookup.validate().map_err(ValidationErrorResponse::from)?;

    let uid = lookup.uid.unwrap_or_default();
    let todo_id = TodoId::from(lookup.id.unwrap_or_default());
    info!("Get todo item {todo_id} of user {uid}");

    let todo = todo_service
        .user_todo_by_id(&uid, &todo_id, ext_cxn, todo_reader)
        .await
        .map_err(todo_error_response)?;
    let Some(todo) = todo else {
        return Err(NotFoundResponse("todo item").into());
    };

    Ok(Json(todo.into()))
}

#[utoipa::path(
    put,
    path = "/todos/{id}/{uid}",
    tag = TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "The todo item to update"),
        ("uid" = String, Path, description = "Owner of the todo item"),
    ),
    request_body = UpdateTodo,
    responses(
        (status = 200, description = "Todo item text replaced", body = MessageResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Replaces the text of a todo item, leaving its siblings untouched
async fn update_todo(
    path: OwnedTodoPath,
    update: UpdateTodo,
    ext_cxn: &impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    path.validate().map_err(ValidationErrorResponse::from)?;
    update.validate().map_err(ValidationErrorResponse::from)?;

    let todo_id = TodoId::from(path.id);
    info!("Updating todo item {todo_id} of user {}", path.uid);
    let domain_update = domain::todo::UpdateTodo::from(update);

    todo_service
        .update_todo(&path.uid, &todo_id, &domain_update, ext_cxn, todo_writer)
        .await
        .map_err(todo_error_response)?;

    Ok(Json(MessageResponse::new(ITEM_UPDATED)))
}

#[utoipa::path(
    get,
    path = "/todos/",
    tag = TODO_API_GROUP,
    responses(
        (status = 400, response = BasicErrorResponse),
    ),
)]
/// Answers a todo list request that left out the owner's uid
async fn missing_todo_owner() -> ValidationErrorResponse {
    ValidationErrorResponse::missing_fields(&["uid"])
}
