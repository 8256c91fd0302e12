use super::not_blank;
use crate::domain;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use utoipa::openapi::{RefOr, Schema};
use validator::Validate;

/// DTO for creating a standalone todo. Fields besides `uid` and `todo` are stored as-is.
#[derive(Deserialize, Validate, Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewStandaloneTodo {
    #[validate(required, custom = "not_blank")]
    pub uid: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub todo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'schem> ToSchema<'schem> for NewStandaloneTodo {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "NewStandaloneTodo",
            super::open_object_schema(&["uid", "todo"], &[]).into(),
        )
    }
}

impl From<NewStandaloneTodo> for Map<String, Value> {
    fn from(value: NewStandaloneTodo) -> Self {
        let mut fields = value.extra;
        fields.insert("uid".to_owned(), Value::String(value.uid.unwrap_or_default()));
        fields.insert("todo".to_owned(), Value::String(value.todo.unwrap_or_default()));

        fields
    }
}

/// DTO for a stored standalone todo
#[derive(Serialize, Debug)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub struct StandaloneTodo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl<'schem> ToSchema<'schem> for StandaloneTodo {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "StandaloneTodo",
            super::open_object_schema(&["_id"], &["uid", "todo"]).into(),
        )
    }
}

impl From<domain::standalone_todo::StandaloneTodo> for StandaloneTodo {
    fn from(value: domain::standalone_todo::StandaloneTodo) -> Self {
        StandaloneTodo {
            id: value.id.into(),
            fields: value.fields,
        }
    }
}

/// DTO for a partial update. Every field present is merged into the stored todo.
#[derive(Deserialize, Debug)]
#[cfg_attr(test, derive(Serialize))]
#[serde(transparent)]
pub struct StandaloneTodoPatch(pub Map<String, Value>);

impl<'schem> ToSchema<'schem> for StandaloneTodoPatch {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "StandaloneTodoPatch",
            super::open_object_schema(&[], &["todo"]).into(),
        )
    }
}
