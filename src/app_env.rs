use anyhow::{Context, anyhow};
use std::env;
use std::str::FromStr;

/// Full MongoDB connection string. Takes precedence over [DB_USER], [DB_PASS] and [DB_HOST].
pub const DB_URL: &str = "MONGODB_URI";
/// Database user, used to build a connection string when [DB_URL] is absent
pub const DB_USER: &str = "DB_USER";
/// Database password, used to build a connection string when [DB_URL] is absent
pub const DB_PASS: &str = "DB_PASS";
/// Cluster host name, used to build a connection string when [DB_URL] is absent
pub const DB_HOST: &str = "DB_HOST";
/// Name of the database holding the "users" and "todos" collections
pub const DB_NAME: &str = "DB_NAME";
/// Port the HTTP server listens on
pub const PORT: &str = "PORT";
/// Which todo storage model the server exposes, either "embedded" or "standalone"
pub const TODO_STORAGE: &str = "TODO_STORAGE";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

const DEFAULT_DB_NAME: &str = "TodoApp";
const DEFAULT_DB_HOST: &str = "cluster0.k5v5ibx.mongodb.net";
const DEFAULT_PORT: u16 = 5000;

/// Where a deployment keeps todo items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoStorage {
    /// Todos live in the `todos` array of the owning user document
    #[default]
    Embedded,
    /// Todos are top-level documents in their own collection
    Standalone,
}

impl FromStr for TodoStorage {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "embedded" => Ok(Self::Embedded),
            "standalone" => Ok(Self::Standalone),
            other => Err(anyhow!(
                "unknown todo storage model \"{other}\", expected \"embedded\" or \"standalone\""
            )),
        }
    }
}

/// Settings the server needs at start-up
#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub db_url: String,
    pub db_name: String,
    pub port: u16,
    pub storage: TodoStorage,
}

impl Settings {
    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through [lookup], which returns the value of a variable if it is set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let db_url = match lookup(DB_URL) {
            Some(url) => url,
            None => {
                let user = lookup(DB_USER)
                    .with_context(|| format!("either {DB_URL} or {DB_USER} must be set"))?;
                let pass = lookup(DB_PASS)
                    .with_context(|| format!("{DB_PASS} must be set alongside {DB_USER}"))?;
                let host = lookup(DB_HOST).unwrap_or_else(|| DEFAULT_DB_HOST.to_owned());

                // Credentials may contain URI delimiters like '@' or ':'
                let user = urlencoding::encode(&user);
                let pass = urlencoding::encode(&pass);

                format!("mongodb+srv://{user}:{pass}@{host}/?retryWrites=true&w=majority")
            }
        };

        let port = match lookup(PORT) {
            Some(raw_port) => raw_port
                .parse()
                .with_context(|| format!("{PORT} must be a port number, got \"{raw_port}\""))?,
            None => DEFAULT_PORT,
        };

        let storage = match lookup(TODO_STORAGE) {
            Some(raw_storage) => raw_storage.parse()?,
            None => TodoStorage::default(),
        };

        Ok(Settings {
            db_url,
            db_name: lookup(DB_NAME).unwrap_or_else(|| DEFAULT_DB_NAME.to_owned()),
            port,
            storage,
        })
    }
}
