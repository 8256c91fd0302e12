use crate::domain;
use crate::domain::TodoId;
use crate::domain::standalone_todo::StandaloneTodo;
use crate::external_connections::ExternalConnectivity;
use anyhow::{Context, Error, anyhow};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use serde_json::{Map, Value};

fn todos(ext_cxn: &impl ExternalConnectivity) -> Result<mongodb::Collection<Document>, Error> {
    let db = ext_cxn.database_cxn()?;

    Ok(db.collection::<Document>(super::TODOS_COLLECTION))
}

fn standalone_todo_from_document(mut document: Document) -> StandaloneTodo {
    let id = document
        .remove("_id")
        .map(super::id_to_string)
        .unwrap_or_default();

    StandaloneTodo {
        id: TodoId::from(id),
        fields: super::document_to_json(document),
    }
}

pub struct DbStandaloneTodoReader;

impl domain::standalone_todo::driven_ports::StandaloneTodoReader for DbStandaloneTodoReader {
    async fn all_todos(
        &self,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Vec<StandaloneTodo>, Error> {
        let documents: Vec<Document> = todos(ext_cxn)?
            .find(doc! {})
            .await
            .context("trying to list standalone todos")?
            .try_collect()
            .await
            .context("trying to read the standalone todo cursor")?;

        Ok(documents
            .into_iter()
            .map(standalone_todo_from_document)
            .collect())
    }

    async fn todo_by_id(
        &self,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<StandaloneTodo>, Error> {
        let Some(oid) = super::parse_object_id(todo_id) else {
            return Ok(None);
        };

        let todo = todos(ext_cxn)?
            .find_one(doc! { "_id": oid })
            .await
            .context("trying to fetch a standalone todo by id")?;

        Ok(todo.map(standalone_todo_from_document))
    }
}

pub struct DbStandaloneTodoWriter;

impl domain::standalone_todo::driven_ports::StandaloneTodoWriter for DbStandaloneTodoWriter {
    async fn create_todo(
        &self,
        fields: &Map<String, Value>,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<TodoId, Error> {
        let new_todo = super::json_to_document(fields)?;
        let insert_result = todos(ext_cxn)?
            .insert_one(new_todo)
            .await
            .context("trying to insert a standalone todo")?;

        match insert_result.inserted_id {
            Bson::ObjectId(oid) => Ok(TodoId::from(oid.to_hex())),
            other => Err(anyhow!("store generated an unexpected todo id: {other}")),
        }
    }

    async fn merge_todo_fields(
        &self,
        todo_id: &TodoId,
        fields: &Map<String, Value>,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let Some(oid) = super::parse_object_id(todo_id) else {
            return Ok(false);
        };

        let merged_fields = super::json_to_document(fields)?;
        let update_result = todos(ext_cxn)?
            .update_one(doc! { "_id": oid }, doc! { "$set": merged_fields })
            .await
            .context("trying to merge fields into a standalone todo")?;

        Ok(update_result.matched_count > 0)
    }

    async fn delete_todo(
        &self,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let Some(oid) = super::parse_object_id(todo_id) else {
            return Ok(false);
        };

        let delete_result = todos(ext_cxn)?
            .delete_one(doc! { "_id": oid })
            .await
            .context("trying to delete a standalone todo")?;

        Ok(delete_result.deleted_count > 0)
    }
}
