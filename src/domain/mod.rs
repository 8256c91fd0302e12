use derive_more::Display;

pub mod standalone_todo;
pub mod todo;
pub mod user;

#[cfg(test)]
pub mod test_util;

/// Key identifying a todo item. Both storage models share it: embedded todos use a
/// caller-supplied value or one generated by the store, standalone todos always use the
/// store-generated document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct TodoId(String);

impl TodoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<TodoId> for String {
    fn from(value: TodoId) -> Self {
        value.0
    }
}
