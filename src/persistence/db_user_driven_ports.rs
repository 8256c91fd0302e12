use super::db_todo_driven_ports::todos_from_user_document;
use crate::domain;
use crate::domain::user::{CreateUser, TodoUser};
use crate::external_connections::ExternalConnectivity;
use anyhow::{Context, Error, anyhow};
use mongodb::bson::{Bson, Document, doc};

fn users(ext_cxn: &impl ExternalConnectivity) -> Result<mongodb::Collection<Document>, Error> {
    let db = ext_cxn.database_cxn()?;

    Ok(db.collection::<Document>(super::USERS_COLLECTION))
}

/// Splits a stored user document into its identity, todos and remaining profile fields
fn user_from_document(mut document: Document) -> TodoUser {
    let id = document
        .remove("_id")
        .map(super::id_to_string)
        .unwrap_or_default();
    let todos = todos_from_user_document(&document);
    document.remove("todos");
    let uid = match document.remove("uid") {
        Some(Bson::String(uid)) => uid,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    TodoUser {
        id,
        uid,
        profile: super::document_to_json(document),
        todos,
    }
}

pub struct DbDetectUser;

impl domain::user::driven_ports::DetectUser for DbDetectUser {
    async fn user_exists(
        &self,
        uid: &str,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let users_with_uid = users(ext_cxn)?
            .count_documents(doc! { "uid": uid })
            .limit(1)
            .await
            .context("Detecting user with uid")?;

        Ok(users_with_uid > 0)
    }
}

pub struct DbReadUsers;

impl domain::user::driven_ports::UserReader for DbReadUsers {
    async fn get_by_uid(
        &self,
        uid: &str,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<TodoUser>, Error> {
        let user = users(ext_cxn)?
            .find_one(doc! { "uid": uid })
            .await
            .context("Fetching a user by uid")?;

        Ok(user.map(user_from_document))
    }
}

pub struct DbWriteUsers;

impl domain::user::driven_ports::UserWriter for DbWriteUsers {
    async fn create_user(
        &self,
        user: &CreateUser,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<String>, Error> {
        let mut new_user = super::json_to_document(&user.profile)?;
        new_user.insert("uid", user.uid.as_str());
        new_user.insert("todos", Bson::Array(Vec::new()));

        let insert_result = match users(ext_cxn)?.insert_one(new_user).await {
            Ok(insert_result) => insert_result,
            // The unique index on uid caught a registration racing with ours
            Err(err) if super::is_duplicate_key(&err) => return Ok(None),
            Err(err) => return Err(anyhow!(err).context("Inserting new user")),
        };

        match insert_result.inserted_id {
            Bson::ObjectId(oid) => Ok(Some(oid.to_hex())),
            other => Err(anyhow!("store generated an unexpected user id: {other}")),
        }
    }
}
