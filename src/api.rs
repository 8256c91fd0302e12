pub mod health;
pub mod standalone_todo;
pub mod swagger_main;
pub mod todo;
pub mod user;

#[cfg(test)]
pub mod test_util;

const ITEM_ADDED: &str = "Item added successfully";
const ITEM_DELETED: &str = "Item deleted successfully";
const ITEM_UPDATED: &str = "Item updated successfully";
