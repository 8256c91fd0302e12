use crate::app_env::Settings;
use crate::persistence::USERS_COLLECTION;
use anyhow::Context;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database, IndexModel};
use tracing::info;

/// Builds a pooled client against the configured cluster and returns a handle to the
/// application database. The client pins Stable API v1 in strict mode.
pub async fn connect(settings: &Settings) -> Result<Database, anyhow::Error> {
    let mut client_options = ClientOptions::parse(settings.db_url.as_str())
        .await
        .context("parsing the database connection string")?;
    let server_api = ServerApi::builder()
        .version(ServerApiVersion::V1)
        .strict(true)
        .deprecation_errors(true)
        .build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options).context("building the database client")?;
    let db = client.database(&settings.db_name);
    ensure_indexes(&db).await?;

    info!("Connected to database {}", settings.db_name);
    Ok(db)
}

/// Creates the indexes the application relies on. Creating an index that already exists is a no-op.
pub async fn ensure_indexes(db: &Database) -> Result<(), anyhow::Error> {
    let unique_uid = IndexModel::builder()
        .keys(doc! { "uid": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    db.collection::<Document>(USERS_COLLECTION)
        .create_index(unique_uid)
        .await
        .context("creating the unique index on user uids")?;

    Ok(())
}
