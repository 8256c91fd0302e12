use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use todo_rest::app_env::Settings;
use todo_rest::persistence::ExternalConnectivity;
use todo_rest::{SharedData, build_router, db, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv_loaded = dotenv().is_ok();
    logging::setup_logging(logging::init_env_filter());
    if !dotenv_loaded {
        info!("No .env file found, reading configuration from the environment only");
    }

    let settings = Settings::from_env().context("reading server settings")?;
    info!("Serving todos with the {:?} storage model", settings.storage);

    let db = db::connect(&settings).await?;
    let shared_data = Arc::new(SharedData {
        ext_cxn: ExternalConnectivity::new(db),
    });
    let router = build_router(settings.storage, shared_data);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", settings.port))
        .await
        .with_context(|| format!("binding to port {}", settings.port))?;
    info!("Todo server running on port {}", settings.port);

    axum::serve(listener, router)
        .await
        .context("serving HTTP requests")?;

    Ok(())
}
