use super::not_blank;
use super::todo::Todo;
use crate::domain;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::openapi::{ArrayBuilder, Ref, RefOr, Schema};
use utoipa::ToSchema;
use validator::Validate;

/// Profile keys the store owns. A registration body can't set them.
const RESERVED_PROFILE_FIELDS: [&str; 2] = ["_id", "todos"];

/// DTO for registering a user via the API. Anything besides `uid` is kept as profile data.
#[derive(Deserialize, Validate, Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewUser {
    #[validate(required, custom = "not_blank")]
    pub uid: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl<'schem> ToSchema<'schem> for NewUser {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "NewUser",
            super::open_object_schema(&["uid"], &["name", "email"]).into(),
        )
    }
}

impl From<NewUser> for domain::user::CreateUser {
    fn from(value: NewUser) -> Self {
        let profile = value
            .profile
            .into_iter()
            .filter(|(key, _)| !RESERVED_PROFILE_FIELDS.contains(&key.as_str()))
            .collect();

        domain::user::CreateUser {
            uid: value.uid.unwrap_or_default(),
            profile,
        }
    }
}

/// DTO for a registered user, including their todo list
#[derive(Serialize, Debug)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub struct TodoUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub uid: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
    pub todos: Vec<Todo>,
}

impl<'schem> ToSchema<'schem> for TodoUser {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        let todos = ArrayBuilder::new().items(Ref::from_schema_name("Todo"));

        (
            "TodoUser",
            super::open_object_schema(&["_id", "uid"], &["name", "email"])
                .property("todos", todos)
                .required("todos")
                .into(),
        )
    }
}

impl From<domain::user::TodoUser> for TodoUser {
    fn from(value: domain::user::TodoUser) -> Self {
        TodoUser {
            id: value.id,
            uid: value.uid,
            profile: value.profile,
            todos: value.todos.into_iter().map(Todo::from).collect(),
        }
    }
}

/// DTO for a successful user lookup
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct UserFoundResponse {
    #[schema(example = "user found")]
    pub message: String,
    pub data: TodoUser,
}
