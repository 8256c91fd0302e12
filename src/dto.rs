use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::openapi::schema::{AdditionalProperties, ObjectBuilder, SchemaType};
use utoipa::{OpenApi, ToSchema};
use validator::ValidationError;

#[cfg(test)]
use serde::Deserialize;

pub mod standalone_todo;
pub mod todo;
pub mod user;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            MessageResponse,
            InsertedIdResponse,
            user::NewUser,
            user::TodoUser,
            user::UserFoundResponse,
            todo::Todo,
            todo::AddTodo,
            todo::NewTodo,
            todo::UpdateTodo,
            standalone_todo::NewStandaloneTodo,
            standalone_todo::StandaloneTodo,
            standalone_todo::StandaloneTodoPatch,
        ),
        responses(crate::routing_utils::BasicErrorResponse),
    )
)]
/// Captures OpenAPI schemas and canned responses defined in the DTO module
pub struct OpenApiSchemas;

/// Rejects strings that are empty or whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

/// Dotted paths of every integer in [fields] that is too large for the store's signed 64-bit
/// integers
pub fn oversized_integer_paths(fields: &Map<String, Value>) -> Vec<String> {
    let mut paths = Vec::new();
    for (key, value) in fields {
        collect_oversized_integers(key.clone(), value, &mut paths);
    }

    paths
}

fn collect_oversized_integers(path: String, value: &Value, paths: &mut Vec<String>) {
    match value {
        Value::Number(number) if number.as_i64().is_none() && number.is_u64() => paths.push(path),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_oversized_integers(format!("{path}[{index}]"), item, paths);
            }
        }
        Value::Object(nested) => {
            for (key, item) in nested {
                collect_oversized_integers(format!("{path}.{key}"), item, paths);
            }
        }
        _ => {}
    }
}

/// Schema for a JSON object which documents a few known string properties and accepts any others
fn open_object_schema(required: &[&str], optional: &[&str]) -> ObjectBuilder {
    let string_property = || ObjectBuilder::new().schema_type(SchemaType::String);
    let mut schema = ObjectBuilder::new()
        .additional_properties(Some(AdditionalProperties::FreeForm(true)));

    for property in required {
        schema = schema.property(*property, string_property()).required(*property);
    }
    for property in optional {
        schema = schema.property(*property, string_property());
    }

    schema
}

/// Acknowledges a completed request
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct MessageResponse {
    #[schema(example = "Item deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        MessageResponse {
            message: message.to_owned(),
        }
    }
}

/// Acknowledges a created entity and hands back its identifier
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct InsertedIdResponse {
    #[schema(example = "Registered successfully")]
    pub message: String,
    #[schema(example = "64b7f0c2a1b2c3d4e5f60718")]
    pub data: String,
}

impl InsertedIdResponse {
    pub fn new(message: &str, data: impl Into<String>) -> Self {
        InsertedIdResponse {
            message: message.to_owned(),
            data: data.into(),
        }
    }
}
