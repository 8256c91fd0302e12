use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;
use utoipa::{ToResponse, ToSchema};
use validator::{ValidationErrors, ValidationErrorsKind};

#[cfg(test)]
use serde::Deserialize;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToSchema, ToResponse)]
#[cfg_attr(test, derive(Deserialize))]
#[response(examples(
    ("Missing Input" = (
        summary = "A required parameter was missing or blank (400)",
        value = json!({
            "error_code": "missing_input",
            "message": "Please provide uid, todoData.todo",
            "extra_info": ["uid", "todoData.todo"]
        })
    )),

    ("Malformed JSON" = (
        summary = "Invalid JSON passed to server (400)",
        value = json!({
            "error_code": "invalid_json",
            "message": "The passed request body contained malformed or unreadable JSON.",
            "extra_info": "Failed to parse the request body as JSON: EOF while parsing an object at line 4 column 0"
        })
    )),

    ("Not Found" = (
        summary = "Entity could not be found (404)",
        value = json!({
            "error_code": "not_found",
            "message": "The requested user could not be found.",
            "extra_info": null
        })
    )),

    ("Conflict" = (
        summary = "The entity already exists (409)",
        value = json!({
            "error_code": "conflict",
            "message": "A user with uid \"u1\" is already registered.",
            "extra_info": null
        })
    )),

    ("Internal Failure" = (
        summary = "Something unexpected went wrong inside the server (500)",
        value = json!({
            "error_code": "internal_error",
            "message": "there is an error on internal server.",
            "extra_info": null
        })
    ))
))]
pub struct BasicErrorResponse {
    pub error_code: String,
    pub message: String,
    pub extra_info: Option<ExtraInfo>,
}

#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
#[serde(untagged)]
pub enum ExtraInfo {
    /// Dotted paths of every required field that was absent or blank
    MissingFields(Vec<String>),
    Message(String),
}

fn error_response(
    status: StatusCode,
    error_code: &str,
    message: String,
    extra_info: Option<ExtraInfo>,
) -> Response {
    (
        status,
        Json(BasicErrorResponse {
            error_code: error_code.to_owned(),
            message,
            extra_info,
        }),
    )
        .into_response()
}

/// Response type for required input that was missing or blank
pub struct ValidationErrorResponse {
    missing_fields: Vec<String>,
}

impl ValidationErrorResponse {
    pub fn missing_fields(fields: &[&str]) -> Self {
        ValidationErrorResponse {
            missing_fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}

/// Flattens nested validation failures into dotted field paths
fn collect_field_paths(prefix: &str, errors: &ValidationErrors, paths: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(_) => paths.push(path),
            ValidationErrorsKind::Struct(nested) => collect_field_paths(&path, nested, paths),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_paths(&format!("{path}[{index}]"), nested, paths);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        let mut missing_fields = Vec::new();
        collect_field_paths("", &value, &mut missing_fields);
        missing_fields.sort();

        ValidationErrorResponse { missing_fields }
    }
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::BAD_REQUEST,
            "missing_input",
            format!("Please provide {}", self.missing_fields.join(", ")),
            Some(ExtraInfo::MissingFields(self.missing_fields)),
        )
    }
}

/// Response type for a request body holding integers the store can't keep. Holds the dotted
/// paths of the offending fields.
pub struct OutOfRangeResponse(pub Vec<String>);

impl IntoResponse for OutOfRangeResponse {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_json",
            "The passed request body contained integers too large to store.".to_owned(),
            Some(ExtraInfo::Message(format!(
                "Integers must fit in a signed 64-bit range: {}",
                self.0.join(", ")
            ))),
        )
    }
}

/// Response type for an entity that doesn't exist. Holds the kind of entity, like "user".
pub struct NotFoundResponse(pub &'static str);

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("The requested {} could not be found.", self.0),
            None,
        )
    }
}

/// Response type for a write that collides with an existing entity
pub struct ConflictResponse(pub String);

impl IntoResponse for ConflictResponse {
    fn into_response(self) -> Response {
        error_response(StatusCode::CONFLICT, "conflict", self.0, None)
    }
}

/// Response type for store failures. The cause is logged, never sent to the caller.
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Request failed with internal error: {:#}", self.0);

        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "there is an error on internal server.".to_owned(),
            None,
        )
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(axum_macros::FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
#[derive(Debug)]
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl From<BytesRejection> for JsonErrorResponse {
    fn from(value: BytesRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl From<serde_json::Error> for JsonErrorResponse {
    fn from(value: serde_json::Error) -> Self {
        JsonErrorResponse {
            parse_problem: format!("Failed to parse the request body as JSON: {value}"),
        }
    }
}

/// JSON body extractor for requests where the body itself may be left out. An empty or
/// whitespace-only body extracts as [None], so handlers can report the missing fields instead
/// of a parse failure. The content type isn't checked.
pub struct OptionalJson<T>(pub Option<T>);

impl<T> OptionalJson<T>
where
    T: DeserializeOwned,
{
    fn from_bytes(bytes: &[u8]) -> Result<Self, JsonErrorResponse> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(None));
        }

        Ok(OptionalJson(Some(serde_json::from_slice(bytes)?)))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;

        Self::from_bytes(&bytes)
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_json",
            "The passed request body contained malformed or unreadable JSON.".to_owned(),
            Some(ExtraInfo::Message(self.parse_problem)),
        )
    }
}
