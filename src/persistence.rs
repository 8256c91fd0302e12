pub mod db_standalone_todo_driven_ports;
pub mod db_todo_driven_ports;
pub mod db_user_driven_ports;

use crate::domain::TodoId;
use crate::external_connections;
use anyhow::anyhow;
use mongodb::Database;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use serde_json::{Map, Value};

/// Collection holding one document per user, with that user's todos embedded in it
pub const USERS_COLLECTION: &str = "users";
/// Collection holding standalone todo records
pub const TODOS_COLLECTION: &str = "todos";

/// Server error code for a violated unique index
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: Database,
}

impl ExternalConnectivity {
    pub fn new(db: Database) -> Self {
        ExternalConnectivity { db }
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    fn database_cxn(&self) -> Result<Database, anyhow::Error> {
        Ok(self.db.clone())
    }
}

/// True if the store refused a write because it would violate a unique index
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Parses a store identifier, returning [None] for strings the store could never have generated
fn parse_object_id(todo_id: &TodoId) -> Option<ObjectId> {
    ObjectId::parse_str(todo_id.as_str()).ok()
}

/// Renders a document identifier as the string handed out to API consumers
fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(raw) => raw,
        other => other.to_string(),
    }
}

/// Converts a stored document into plain JSON, leaving store-specific values in relaxed
/// extended JSON form
fn document_to_json(document: Document) -> Map<String, Value> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        // A document always renders as a JSON object
        _ => Map::new(),
    }
}

/// Converts free-form JSON fields into a document ready to be written
fn json_to_document(fields: &Map<String, Value>) -> Result<Document, anyhow::Error> {
    mongodb::bson::to_document(fields)
        .map_err(|err| anyhow!(err).context("converting JSON fields into a document"))
}
