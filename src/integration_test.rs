mod test_util;
mod todo_api;
mod user_api;
