use super::not_blank;
use crate::domain;
use crate::domain::TodoId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// A todo identifier as clients send it. Older clients used numeric ids, so numbers are
/// accepted and kept in their textual form.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawTodoId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawTodoId> for TodoId {
    fn from(value: RawTodoId) -> Self {
        match value {
            RawTodoId::Text(id) => TodoId::from(id),
            RawTodoId::Number(id) => TodoId::from(id.to_string()),
        }
    }
}

fn todo_id_not_blank(value: &RawTodoId) -> Result<(), ValidationError> {
    match value {
        RawTodoId::Text(id) => not_blank(id),
        RawTodoId::Number(_) => Ok(()),
    }
}

/// DTO for a todo item on the API
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub struct Todo {
    #[schema(example = "t1")]
    pub id: String,
    #[schema(example = "buy milk")]
    pub todo: String,
}

impl From<domain::todo::Todo> for Todo {
    fn from(value: domain::todo::Todo) -> Self {
        Todo {
            id: value.id.into(),
            todo: value.text,
        }
    }
}

/// DTO for the todo item to append to a user's list
#[derive(Deserialize, Serialize, Validate, Debug, ToSchema)]
pub struct NewTodo {
    /// Generated by the store when omitted
    #[validate(custom = "todo_id_not_blank")]
    #[schema(value_type = Option<String>, example = "t1")]
    pub id: Option<RawTodoId>,
    #[validate(required, custom = "not_blank")]
    #[schema(value_type = String, example = "buy milk")]
    pub todo: Option<String>,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            id: value.id.map(TodoId::from),
            text: value.todo.unwrap_or_default(),
        }
    }
}

/// DTO for adding a todo item to a user's list
#[derive(Deserialize, Validate, Debug, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct AddTodo {
    #[validate(required, custom = "not_blank")]
    #[schema(value_type = String, example = "u1")]
    pub uid: Option<String>,
    #[serde(rename = "todoData")]
    #[validate(required_nested)]
    #[schema(value_type = NewTodo)]
    pub todo_data: Option<NewTodo>,
}

/// DTO for replacing the text of a todo item
#[derive(Deserialize, Validate, Debug, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct UpdateTodo {
    #[validate(required, custom = "not_blank")]
    #[schema(value_type = String, example = "buy oat milk")]
    pub todo: Option<String>,
}

impl From<UpdateTodo> for domain::todo::UpdateTodo {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::UpdateTodo {
            text: value.todo.unwrap_or_default(),
        }
    }
}

/// Body of a todo deletion: either the bare id or an object carrying it
#[derive(Deserialize, Debug)]
#[cfg_attr(test, derive(Serialize))]
#[serde(untagged)]
pub enum TodoSelector {
    Bare(RawTodoId),
    Keyed { id: Option<RawTodoId> },
}

impl TodoSelector {
    /// The selected id, or [None] when it is absent or blank
    pub fn todo_id(self) -> Option<TodoId> {
        let raw_id = match self {
            TodoSelector::Bare(raw_id) => raw_id,
            TodoSelector::Keyed { id } => id?,
        };
        todo_id_not_blank(&raw_id).ok()?;

        Some(TodoId::from(raw_id))
    }
}

/// Query string identifying one todo item of a user
#[derive(Deserialize, Validate, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodoLookupQuery {
    /// Id of the todo item
    #[validate(required, custom = "not_blank")]
    pub id: Option<String>,
    /// Owner of the todo item
    #[validate(required, custom = "not_blank")]
    pub uid: Option<String>,
}

/// Path of a todo item scoped to its owner
#[derive(Deserialize, Validate, Debug)]
pub struct OwnedTodoPath {
    #[validate(custom = "not_blank")]
    pub id: String,
    #[validate(custom = "not_blank")]
    pub uid: String,
}
