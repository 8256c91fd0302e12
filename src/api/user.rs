use crate::domain::user::driven_ports::{DetectUser, UserReader, UserWriter};
use crate::domain::user::driving_ports::{CreateUserError, UserPort};
use crate::dto::InsertedIdResponse;
use crate::dto::user::{NewUser, UserFoundResponse};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BasicErrorResponse, ConflictResponse, GenericErrorResponse, Json, NotFoundResponse,
    OutOfRangeResponse, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

const USER_FOUND: &str = "user found";
const REGISTERED: &str = "Registered successfully";

#[derive(OpenApi)]
#[openapi(paths(get_user, create_user, missing_uid))]
/// Defines the OpenAPI spec for user endpoints
pub struct UsersApi;

/// Used to group user endpoints together in the OpenAPI documentation
pub const USER_API_GROUP: &str = "Users";

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/users",
            post(
                |State(app_state): AppState, Json(new_user): Json<NewUser>| async move {
                    let user_service = domain::user::UserService;
                    let user_writer = persistence::db_user_driven_ports::DbWriteUsers;
                    let user_detect = persistence::db_user_driven_ports::DbDetectUser;

                    create_user(
                        new_user,
                        &app_state.ext_cxn,
                        &user_service,
                        &user_writer,
                        &user_detect,
                    )
                    .await
                },
            ),
        )
        .route("/users/", get(missing_uid))
        .route(
            "/users/:uid",
            get(
                |State(app_state): AppState, Path(uid): Path<String>| async move {
                    let user_service = domain::user::UserService;
                    let user_reader = persistence::db_user_driven_ports::DbReadUsers;

                    get_user(uid, &app_state.ext_cxn, &user_service, &user_reader).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/users/{uid}",
    tag = USER_API_GROUP,
    params(
        ("uid" = String, Path, description = "The caller-assigned identifier of the user"),
    ),
    responses(
        (status = 200, description = "The user and their todo list", body = UserFoundResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a user by their uid.
async fn get_user(
    uid: String,
    ext_cxn: &impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_reader: &impl UserReader,
) -> Result<Json<UserFoundResponse>, ErrorResponse> {
    info!("Requested user {uid}");
    if dto::not_blank(&uid).is_err() {
        return Err(ValidationErrorResponse::missing_fields(&["uid"]).into());
    }

    let user = user_service
        .user_by_uid(&uid, ext_cxn, user_reader)
        .await
        .map_err(GenericErrorResponse)?;
    let Some(user) = user else {
        return Err(NotFoundResponse("user").into());
    };

    Ok(Json(UserFoundResponse {
        message: USER_FOUND.to_owned(),
        data: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = USER_API_GROUP,
    request_body = NewUser,
    responses(
        (status = 201, description = "User registered", body = InsertedIdResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 409, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Registers a user. Everything in the body besides `uid` is stored as profile data.
async fn create_user(
    new_user: NewUser,
    ext_cxn: &impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_writer: &impl UserWriter,
    user_detect: &impl DetectUser,
) -> Result<(StatusCode, Json<InsertedIdResponse>), ErrorResponse> {
    new_user
        .validate()
        .map_err(ValidationErrorResponse::from)?;
    let oversized = dto::oversized_integer_paths(&new_user.profile);
    if !oversized.is_empty() {
        return Err(OutOfRangeResponse(oversized).into());
    }

    let create_request = domain::user::CreateUser::from(new_user);
    info!("Attempt to register user {}", create_request.uid);
    let creation_result = user_service
        .create_user(&create_request, ext_cxn, user_writer, user_detect)
        .await;

    match creation_result {
        Ok(new_id) => Ok((
            StatusCode::CREATED,
            Json(InsertedIdResponse::new(REGISTERED, new_id)),
        )),
        Err(CreateUserError::UserAlreadyExists(uid)) => Err(ConflictResponse(format!(
            "A user with uid \"{uid}\" is already registered."
        ))
        .into()),
        Err(CreateUserError::PortError(err)) => Err(GenericErrorResponse(err).into()),
    }
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = USER_API_GROUP,
    responses(
        (status = 400, response = BasicErrorResponse),
    ),
)]
/// Answers a user lookup that left out the uid
async fn missing_uid() -> ValidationErrorResponse {
    ValidationErrorResponse::missing_fields(&["uid"])
}
