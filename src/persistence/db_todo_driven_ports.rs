use crate::domain;
use crate::domain::TodoId;
use crate::domain::todo::driven_ports::RemovalOutcome;
use crate::domain::todo::{NewTodo, Todo, UpdateTodo};
use crate::external_connections::ExternalConnectivity;
use anyhow::{Context, Error};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use tracing::warn;

fn users(ext_cxn: &impl ExternalConnectivity) -> Result<mongodb::Collection<Document>, Error> {
    let db = ext_cxn.database_cxn()?;

    Ok(db.collection::<Document>(super::USERS_COLLECTION))
}

/// Every stored form a todo id may take. Older clients stored numeric ids, which are handed out
/// as strings, so an id in canonical integer form also matches its number.
fn stored_id_forms(todo_id: &TodoId) -> Vec<Bson> {
    let mut forms = vec![Bson::String(todo_id.as_str().to_owned())];
    if let Ok(number) = todo_id.as_str().parse::<i64>() {
        if number.to_string() == todo_id.as_str() {
            forms.push(Bson::Int64(number));
        }
    }

    forms
}

/// Condition matching an embedded todo id in any of its stored forms
fn id_matches(todo_id: &TodoId) -> Document {
    doc! { "$in": stored_id_forms(todo_id) }
}

/// Reads an embedded todo element. Elements missing an id or a text are skipped.
fn todo_from_bson(element: &Bson) -> Option<Todo> {
    let element = element.as_document()?;
    let id = element.get("id").cloned().map(super::id_to_string)?;
    let text = element.get_str("todo").ok()?;

    Some(Todo {
        id: TodoId::from(id),
        text: text.to_owned(),
    })
}

/// Reads the `todos` array of a user document. A document without one has no todos.
pub(super) fn todos_from_user_document(user: &Document) -> Vec<Todo> {
    let Ok(elements) = user.get_array("todos") else {
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(|element| {
            let todo = todo_from_bson(element);
            if todo.is_none() {
                warn!("Skipping malformed embedded todo element: {element}");
            }
            todo
        })
        .collect()
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn todos_for_user(
        &self,
        uid: &str,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<Vec<Todo>>, Error> {
        let user = users(ext_cxn)?
            .find_one(doc! { "uid": uid })
            .projection(doc! { "todos": 1 })
            .await
            .context("trying to fetch the todo list of a user")?;

        Ok(user.as_ref().map(todos_from_user_document))
    }

    async fn user_todo_by_id(
        &self,
        uid: &str,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        // The positional projection narrows the array down to the first matching element
        let user = users(ext_cxn)?
            .find_one(doc! { "uid": uid, "todos.id": id_matches(todo_id) })
            .projection(doc! { "todos.$": 1 })
            .await
            .context("trying to fetch a todo item by id")?;

        Ok(user.and_then(|user| todos_from_user_document(&user).into_iter().next()))
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn append_todo(
        &self,
        uid: &str,
        new_todo: &NewTodo,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<TodoId>, Error> {
        let todo_id = match new_todo.id {
            Some(ref id) => id.clone(),
            None => TodoId::from(ObjectId::new().to_hex()),
        };

        // Only matches when no sibling already carries this id
        let push_result = users(ext_cxn)?
            .update_one(
                doc! { "uid": uid, "todos.id": { "$nin": stored_id_forms(&todo_id) } },
                doc! { "$push": { "todos": { "id": todo_id.as_str(), "todo": new_todo.text.as_str() } } },
            )
            .await
            .context("trying to append a todo item to a user")?;

        if push_result.modified_count > 0 {
            Ok(Some(todo_id))
        } else {
            Ok(None)
        }
    }

    async fn update_todo(
        &self,
        uid: &str,
        todo_id: &TodoId,
        update: &UpdateTodo,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let update_result = users(ext_cxn)?
            .update_one(
                doc! { "uid": uid, "todos.id": id_matches(todo_id) },
                doc! { "$set": { "todos.$[elem].todo": update.text.as_str() } },
            )
            .array_filters(vec![doc! { "elem.id": id_matches(todo_id) }])
            .await
            .context("trying to update a todo item in place")?;

        Ok(update_result.matched_count > 0)
    }

    async fn remove_todo(
        &self,
        uid: &str,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<RemovalOutcome, Error> {
        let pull_result = users(ext_cxn)?
            .update_one(
                doc! { "uid": uid },
                doc! { "$pull": { "todos": { "id": id_matches(todo_id) } } },
            )
            .await
            .context("trying to remove a todo item from a user")?;

        let outcome = if pull_result.matched_count == 0 {
            RemovalOutcome::UserMissing
        } else if pull_result.modified_count == 0 {
            RemovalOutcome::NoMatchingTodo
        } else {
            RemovalOutcome::Removed
        };

        Ok(outcome)
    }
}
