use crate::domain::user::driving_ports::CreateUserError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use serde_json::{Map, Value};
use thiserror::Error;

/// A registered user along with the todo items embedded in their document
#[derive(PartialEq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoUser {
    /// Identifier the store assigned at registration
    pub id: String,
    /// Identifier supplied by the caller, typically from an auth provider
    pub uid: String,
    pub profile: Map<String, Value>,
    pub todos: Vec<super::todo::Todo>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq))]
pub struct CreateUser {
    pub uid: String,
    pub profile: Map<String, Value>,
}

pub mod driven_ports {
    use super::*;

    pub trait UserReader {
        async fn get_by_uid(
            &self,
            uid: &str,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<TodoUser>, anyhow::Error>;
    }

    pub trait UserWriter {
        /// Stores a new user and returns the identifier the store generated for it, or [None]
        /// if the store already holds a user with the same uid.
        async fn create_user(
            &self,
            user: &CreateUser,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<String>, anyhow::Error>;
    }

    pub trait DetectUser {
        async fn user_exists(
            &self,
            uid: &str,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    #[derive(Debug, Error)]
    pub enum CreateUserError {
        #[error("A user with uid {0} already exists.")]
        UserAlreadyExists(String),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait UserPort {
        async fn user_by_uid(
            &self,
            uid: &str,
            ext_cxn: &impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Option<TodoUser>, anyhow::Error>;
        async fn create_user(
            &self,
            new_user: &CreateUser,
            ext_cxn: &impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
            u_detect: &impl driven_ports::DetectUser,
        ) -> Result<String, CreateUserError>;
    }
}

pub struct UserService;

#[derive(Debug, Error)]
pub(super) enum UserExistsErr {
    #[error("user with uid {0} does not exist")]
    UserDoesNotExist(String),

    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

pub(super) async fn verify_user_exists(
    uid: &str,
    ext_cxn: &impl ExternalConnectivity,
    user_detect: &impl driven_ports::DetectUser,
) -> Result<(), UserExistsErr> {
    let does_user_exist = user_detect.user_exists(uid, ext_cxn).await?;

    if does_user_exist {
        Ok(())
    } else {
        Err(UserExistsErr::UserDoesNotExist(uid.to_owned()))
    }
}

impl driving_ports::UserPort for UserService {
    async fn user_by_uid(
        &self,
        uid: &str,
        ext_cxn: &impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Option<TodoUser>, anyhow::Error> {
        u_reader
            .get_by_uid(uid, ext_cxn)
            .await
            .context("fetching a user by uid")
    }

    async fn create_user(
        &self,
        new_user: &CreateUser,
        ext_cxn: &impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
        u_detect: &impl driven_ports::DetectUser,
    ) -> Result<String, CreateUserError> {
        let user_exists = u_detect
            .user_exists(&new_user.uid, ext_cxn)
            .await
            .context("looking up user during registration")?;
        if user_exists {
            return Err(CreateUserError::UserAlreadyExists(new_user.uid.clone()));
        }

        // A concurrent registration can still win between the check and the insert,
        // in which case the unique index makes the writer report the uid as taken.
        let created_id = u_writer
            .create_user(new_user, ext_cxn)
            .await
            .context("trying to create user at service level")?;

        created_id.ok_or_else(|| CreateUserError::UserAlreadyExists(new_user.uid.clone()))
    }
}
