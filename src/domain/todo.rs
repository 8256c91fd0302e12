use crate::domain;
use crate::domain::TodoId;
use crate::domain::todo::driven_ports::{RemovalOutcome, TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoError;
use crate::domain::user::driven_ports::DetectUser;
use crate::external_connections::ExternalConnectivity;
use tracing::info;

/// A todo item embedded in its owner's user document
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq))]
pub struct NewTodo {
    /// Caller-chosen identifier. The store generates one when absent.
    pub id: Option<TodoId>,
    pub text: String,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq))]
pub struct UpdateTodo {
    pub text: String,
}

pub mod driven_ports {
    use super::*;

    /// What happened when removing a todo from a user's list
    #[derive(Debug, PartialEq, Eq)]
    pub enum RemovalOutcome {
        Removed,
        NoMatchingTodo,
        UserMissing,
    }

    pub trait TodoReader {
        /// Fetches the full todo list of a user, or [None] if the user doesn't exist
        async fn todos_for_user(
            &self,
            uid: &str,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<Vec<Todo>>, anyhow::Error>;
        async fn user_todo_by_id(
            &self,
            uid: &str,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;
    }

    pub trait TodoWriter {
        /// Appends a todo to the user's list as a single atomic operation, refusing it when a
        /// sibling already uses the same id. Returns the id of the appended todo, or [None]
        /// when nothing was appended (either the user is missing or the id is taken).
        async fn append_todo(
            &self,
            uid: &str,
            new_todo: &NewTodo,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<TodoId>, anyhow::Error>;

        /// Replaces the text of one todo in place. Returns false if no todo matched.
        async fn update_todo(
            &self,
            uid: &str,
            todo_id: &TodoId,
            update: &UpdateTodo,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        /// Removes every todo in the user's list carrying [todo_id]
        async fn remove_todo(
            &self,
            uid: &str,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<RemovalOutcome, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("The specified user did not exist.")]
        UserDoesNotExist,
        #[error("The specified todo item did not exist.")]
        TodoDoesNotExist,
        #[error("The user already has a todo item with id {0}.")]
        DuplicateTodoId(TodoId),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    impl From<domain::user::UserExistsErr> for TodoError {
        fn from(value: domain::user::UserExistsErr) -> Self {
            match value {
                domain::user::UserExistsErr::UserDoesNotExist(uid) => {
                    info!("User {uid} didn't exist when working with their todos.");
                    TodoError::UserDoesNotExist
                }
                domain::user::UserExistsErr::PortError(err) => {
                    TodoError::from(err.context("checking that the todo owner exists"))
                }
            }
        }
    }


    pub trait TodoPort {
        async fn todos_for_user(
            &self,
            uid: &str,
            ext_cxn: &impl ExternalConnectivity,
            todo_read: &impl TodoReader,
        ) -> Result<Vec<Todo>, TodoError>;
        async fn user_todo_by_id(
            &self,
            uid: &str,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
            todo_read: &impl TodoReader,
        ) -> Result<Option<Todo>, TodoError>;
        async fn add_todo_for_user(
            &self,
            uid: &str,
            new_todo: &NewTodo,
            ext_cxn: &impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            todo_write: &impl TodoWriter,
        ) -> Result<TodoId, TodoError>;
        async fn update_todo(
            &self,
            uid: &str,
            todo_id: &TodoId,
            update: &UpdateTodo,
            ext_cxn: &impl ExternalConnectivity,
            todo_write: &impl TodoWriter,
        ) -> Result<(), TodoError>;
        /// Deletes a todo. Deleting an id the user doesn't have is a no-op reported as `false`.
        async fn delete_todo(
            &self,
            uid: &str,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
            todo_write: &impl TodoWriter,
        ) -> Result<bool, TodoError>;
    }
}

pub struct TodoService;

impl driving_ports::TodoPort for TodoService {
    async fn todos_for_user(
        &self,
        uid: &str,
        ext_cxn: &impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<Todo>, TodoError> {
        todo_read
            .todos_for_user(uid, ext_cxn)
            .await?
            .ok_or(TodoError::UserDoesNotExist)
    }

    async fn user_todo_by_id(
        &self,
        uid: &str,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Option<Todo>, TodoError> {
        let todo = todo_read.user_todo_by_id(uid, todo_id, ext_cxn).await?;

        Ok(todo)
    }

    async fn add_todo_for_user(
        &self,
        uid: &str,
        new_todo: &NewTodo,
        ext_cxn: &impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoId, TodoError> {
        let appended_id = todo_write.append_todo(uid, new_todo, ext_cxn).await?;
        if let Some(todo_id) = appended_id {
            return Ok(todo_id);
        }

        // Nothing was appended: either the owner is gone or the id is already in their list
        domain::user::verify_user_exists(uid, ext_cxn, u_detect).await?;
        match new_todo.id {
            Some(ref taken_id) => Err(TodoError::DuplicateTodoId(taken_id.clone())),
            None => Err(TodoError::PortError(anyhow::anyhow!(
                "store refused a todo with a generated id for user {uid}"
            ))),
        }
    }

    async fn update_todo(
        &self,
        uid: &str,
        todo_id: &TodoId,
        update: &UpdateTodo,
        ext_cxn: &impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), TodoError> {
        let updated = todo_write
            .update_todo(uid, todo_id, update, ext_cxn)
            .await?;

        if updated {
            Ok(())
        } else {
            Err(TodoError::TodoDoesNotExist)
        }
    }

    async fn delete_todo(
        &self,
        uid: &str,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<bool, TodoError> {
        match todo_write.remove_todo(uid, todo_id, ext_cxn).await? {
            RemovalOutcome::Removed => Ok(true),
            RemovalOutcome::NoMatchingTodo => Ok(false),
            RemovalOutcome::UserMissing => Err(TodoError::UserDoesNotExist),
        }
    }
}
