use crate::domain::TodoId;
use crate::domain::standalone_todo::driven_ports::{StandaloneTodoReader, StandaloneTodoWriter};
use crate::domain::standalone_todo::driving_ports::StandaloneTodoError;
use crate::external_connections::ExternalConnectivity;
use serde_json::{Map, Value};

/// Fields the store owns on a standalone todo. Callers can't set or overwrite them.
const IDENTITY_FIELDS: [&str; 2] = ["_id", "id"];

/// A todo kept as its own top-level record rather than inside a user
#[derive(PartialEq, Debug, Clone)]
pub struct StandaloneTodo {
    pub id: TodoId,
    /// Free-form payload, typically including `uid` and `todo`
    pub fields: Map<String, Value>,
}

fn without_identity_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !IDENTITY_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub mod driven_ports {
    use super::*;

    pub trait StandaloneTodoReader {
        async fn all_todos(
            &self,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Vec<StandaloneTodo>, anyhow::Error>;
        /// Looks up one record. Identifiers the store could never have generated are simply absent.
        async fn todo_by_id(
            &self,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<StandaloneTodo>, anyhow::Error>;
    }

    pub trait StandaloneTodoWriter {
        async fn create_todo(
            &self,
            fields: &Map<String, Value>,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<TodoId, anyhow::Error>;
        /// Merges [fields] into the record. Returns false if no record matched.
        async fn merge_todo_fields(
            &self,
            todo_id: &TodoId,
            fields: &Map<String, Value>,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
        /// Returns false if no record matched
        async fn delete_todo(
            &self,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StandaloneTodoError {
        #[error("No fields were provided to update the todo item with.")]
        EmptyUpdate,
        #[error("The specified todo item did not exist.")]
        TodoDoesNotExist,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    #[cfg(test)]
    #[allow(clippy::items_after_test_module)]
    mod standalone_todo_error_clone {
        use super::StandaloneTodoError;
        use anyhow::anyhow;

        impl Clone for StandaloneTodoError {
            fn clone(&self) -> Self {
                match self {
                    Self::EmptyUpdate => Self::EmptyUpdate,
                    Self::TodoDoesNotExist => Self::TodoDoesNotExist,
                    Self::PortError(err) => Self::PortError(anyhow!(format!("{err}"))),
                }
            }
        }
    }

    pub trait StandaloneTodoPort {
        async fn all_todos(
            &self,
            ext_cxn: &impl ExternalConnectivity,
            todo_read: &impl StandaloneTodoReader,
        ) -> Result<Vec<StandaloneTodo>, StandaloneTodoError>;
        async fn todo_by_id(
            &self,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
            todo_read: &impl StandaloneTodoReader,
        ) -> Result<StandaloneTodo, StandaloneTodoError>;
        async fn create_todo(
            &self,
            fields: &Map<String, Value>,
            ext_cxn: &impl ExternalConnectivity,
            todo_write: &impl StandaloneTodoWriter,
        ) -> Result<TodoId, StandaloneTodoError>;
        async fn update_todo(
            &self,
            todo_id: &TodoId,
            patch: &Map<String, Value>,
            ext_cxn: &impl ExternalConnectivity,
            todo_write: &impl StandaloneTodoWriter,
        ) -> Result<(), StandaloneTodoError>;
        async fn delete_todo(
            &self,
            todo_id: &TodoId,
            ext_cxn: &impl ExternalConnectivity,
            todo_write: &impl StandaloneTodoWriter,
        ) -> Result<(), StandaloneTodoError>;
    }
}

pub struct StandaloneTodoService;

impl driving_ports::StandaloneTodoPort for StandaloneTodoService {
    async fn all_todos(
        &self,
        ext_cxn: &impl ExternalConnectivity,
        todo_read: &impl StandaloneTodoReader,
    ) -> Result<Vec<StandaloneTodo>, StandaloneTodoError> {
        let todos = todo_read.all_todos(ext_cxn).await?;

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
        todo_read: &impl StandaloneTodoReader,
    ) -> Result<StandaloneTodo, StandaloneTodoError> {
        todo_read
            .todo_by_id(todo_id, ext_cxn)
            .await?
            .ok_or(StandaloneTodoError::TodoDoesNotExist)
    }

    async fn create_todo(
        &self,
        fields: &Map<String, Value>,
        ext_cxn: &impl ExternalConnectivity,
        todo_write: &impl StandaloneTodoWriter,
    ) -> Result<TodoId, StandaloneTodoError> {
        let stored_fields = without_identity_fields(fields);
        let todo_id = todo_write.create_todo(&stored_fields, ext_cxn).await?;

        Ok(todo_id)
    }

    async fn update_todo(
        &self,
        todo_id: &TodoId,
        patch: &Map<String, Value>,
        ext_cxn: &impl ExternalConnectivity,
        todo_write: &impl StandaloneTodoWriter,
    ) -> Result<(), StandaloneTodoError> {
        let merged_fields = without_identity_fields(patch);
        if merged_fields.is_empty() {
            return Err(StandaloneTodoError::EmptyUpdate);
        }

        let matched = todo_write
            .merge_todo_fields(todo_id, &merged_fields, ext_cxn)
            .await?;
        if matched {
            Ok(())
        } else {
            Err(StandaloneTodoError::TodoDoesNotExist)
        }
    }

    async fn delete_todo(
        &self,
        todo_id: &TodoId,
        ext_cxn: &impl ExternalConnectivity,
        todo_write: &impl StandaloneTodoWriter,
    ) -> Result<(), StandaloneTodoError> {
        let deleted = todo_write.delete_todo(todo_id, ext_cxn).await?;
        if deleted {
            Ok(())
        } else {
            Err(StandaloneTodoError::TodoDoesNotExist)
        }
    }
}


#[cfg(test)]
pub mod test_util {
    use super::*;
    use crate::domain::test_util::{Connectivity, FakeImplementation};
    use std::sync::{Mutex, RwLock};

    pub struct InMemoryStandaloneTodoPersistence {
        pub todos: Vec<StandaloneTodo>,
        pub connected: Connectivity,
        highest_id: u32,
    }

    impl InMemoryStandaloneTodoPersistence {
        pub fn new() -> InMemoryStandaloneTodoPersistence {
            InMemoryStandaloneTodoPersistence {
                todos: Vec::new(),
                connected: Connectivity::Connected,
                highest_id: 0,
            }
        }

        pub fn new_locked() -> RwLock<InMemoryStandaloneTodoPersistence> {
            RwLock::new(Self::new())
        }
    }

    impl StandaloneTodoReader for RwLock<InMemoryStandaloneTodoPersistence> {
        async fn all_todos(
            &self,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Vec<StandaloneTodo>, anyhow::Error> {
            let persistence = self.read().expect("standalone todo rwlock poisoned");
            persistence.connected.blow_up_if_disconnected()?;

            Ok(persistence.todos.clone())
        }

        async fn todo_by_id(
            &self,
            todo_id: &TodoId,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<StandaloneTodo>, anyhow::Error> {
            let persistence = self.read().expect("standalone todo rwlock poisoned");
            persistence.connected.blow_up_if_disconnected()?;

            Ok(persistence
                .todos
                .iter()
                .find(|todo| &todo.id == todo_id)
                .cloned())
        }
    }

    impl StandaloneTodoWriter for RwLock<InMemoryStandaloneTodoPersistence> {
        async fn create_todo(
            &self,
            fields: &Map<String, Value>,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<TodoId, anyhow::Error> {
            let mut persistence = self.write().expect("standalone todo rwlock poisoned");
            persistence.connected.blow_up_if_disconnected()?;

            persistence.highest_id += 1;
            let todo_id = TodoId::from(format!("{:024x}", persistence.highest_id));
            persistence.todos.push(StandaloneTodo {
                id: todo_id.clone(),
                fields: fields.clone(),
            });

            Ok(todo_id)
        }

        async fn merge_todo_fields(
            &self,
            todo_id: &TodoId,
            fields: &Map<String, Value>,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error> {
            let mut persistence = self.write().expect("standalone todo rwlock poisoned");
            persistence.connected.blow_up_if_disconnected()?;

            let Some(todo) = persistence.todos.iter_mut().find(|todo| &todo.id == todo_id) else {
                return Ok(false);
            };
            for (key, value) in fields {
                todo.fields.insert(key.clone(), value.clone());
            }

            Ok(true)
        }

        async fn delete_todo(
            &self,
            todo_id: &TodoId,
            _ext_cxn: &impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error> {
            let mut persistence = self.write().expect("standalone todo rwlock poisoned");
            persistence.connected.blow_up_if_disconnected()?;

            let count_before = persistence.todos.len();
            persistence.todos.retain(|todo| &todo.id != todo_id);

            Ok(persistence.todos.len() < count_before)
        }
    }

    pub struct MockStandaloneTodoService {
        pub all_todos_result: FakeImplementation<(), Result<Vec<StandaloneTodo>, StandaloneTodoError>>,
        pub todo_by_id_result: FakeImplementation<TodoId, Result<StandaloneTodo, StandaloneTodoError>>,
        pub create_todo_result:
            FakeImplementation<Map<String, Value>, Result<TodoId, StandaloneTodoError>>,
        pub update_todo_result:
            FakeImplementation<(TodoId, Map<String, Value>), Result<(), StandaloneTodoError>>,
        pub delete_todo_result: FakeImplementation<TodoId, Result<(), StandaloneTodoError>>,
    }

    impl MockStandaloneTodoService {
        pub fn new() -> MockStandaloneTodoService {
            MockStandaloneTodoService {
                all_todos_result: FakeImplementation::new(),
                todo_by_id_result: FakeImplementation::new(),
                create_todo_result: FakeImplementation::new(),
                update_todo_result: FakeImplementation::new(),
                delete_todo_result: FakeImplementation::new(),
            }
        }

        pub fn new_locked() -> Mutex<MockStandaloneTodoService> {
            Mutex::new(Self::new())
        }
    }

    impl driving_ports::StandaloneTodoPort for Mutex<MockStandaloneTodoService> {
        async fn all_todos(
            &self,
            _ext_cxn: &impl ExternalConnectivity,
            _todo_read: &impl StandaloneTodoReader,
        ) -> Result<Vec<StandaloneTodo>, StandaloneTodoError> {
            let mut locked_self = self.lock().expect("mock standalone todo mutex poisoned");
            locked_self.all_todos_result.save_arguments(());

            locked_self.all_todos_result.return_value_result()
        }

        async fn todo_by_id(
            &self,
            todo_id: &TodoId,
            _ext_cxn: &impl ExternalConnectivity,
            _todo_read: &impl StandaloneTodoReader,
        ) -> Result<StandaloneTodo, StandaloneTodoError> {
            let mut locked_self = self.lock().expect("mock standalone todo mutex poisoned");
            locked_self.todo_by_id_result.save_arguments(todo_id.clone());

            locked_self.todo_by_id_result.return_value_result()
        }

        async fn create_todo(
            &self,
            fields: &Map<String, Value>,
            _ext_cxn: &impl ExternalConnectivity,
            _todo_write: &impl StandaloneTodoWriter,
        ) -> Result<TodoId, StandaloneTodoError> {
            let mut locked_self = self.lock().expect("mock standalone todo mutex poisoned");
            locked_self.create_todo_result.save_arguments(fields.clone());

            locked_self.create_todo_result.return_value_result()
        }

        async fn update_todo(
            &self,
            todo_id: &TodoId,
            patch: &Map<String, Value>,
            _ext_cxn: &impl ExternalConnectivity,
            _todo_write: &impl StandaloneTodoWriter,
        ) -> Result<(), StandaloneTodoError> {
            let mut locked_self = self.lock().expect("mock standalone todo mutex poisoned");
            locked_self
                .update_todo_result
                .save_arguments((todo_id.clone(), patch.clone()));

            locked_self.update_todo_result.return_value_result()
        }

        async fn delete_todo(
            &self,
            todo_id: &TodoId,
            _ext_cxn: &impl ExternalConnectivity,
            _todo_write: &impl StandaloneTodoWriter,
        ) -> Result<(), StandaloneTodoError> {
            let mut locked_self = self.lock().expect("mock standalone todo mutex poisoned");
            locked_self.delete_todo_result.save_arguments(todo_id.clone());

            locked_self.delete_todo_result.return_value_result()
        }
    }
}
