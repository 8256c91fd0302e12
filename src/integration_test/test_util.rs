use crate::app_env::{Settings, TodoStorage};
use crate::persistence::ExternalConnectivity;
use crate::{SharedData, build_router, db};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use dotenv::dotenv;
use mongodb::Database;
use rand::{Rng, thread_rng};
use serde_json::Value;
use std::env;
use std::sync::Arc;
use tower::ServiceExt;

/// A throwaway database on the server named by TEST_DB_URL
pub struct TestDatabase {
    db: Database,
}

impl TestDatabase {
    /// Connects to a freshly named database so tests never see each other's data.
    ///
    /// Expects that the TEST_DB_URL environment variable is populated
    pub async fn create() -> TestDatabase {
        if dotenv().is_err() {
            println!("Test is running without .env file.");
        }

        let db_url = env::var("TEST_DB_URL").expect(
            "You must provide the TEST_DB_URL environment variable as the base MongoDB connection string",
        );
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let settings = Settings {
            db_url,
            db_name: format!("test_db_{db_id}"),
            port: 0,
            storage: TodoStorage::Embedded,
        };

        let db = db::connect(&settings)
            .await
            .unwrap_or_else(|err| panic!("Failed to start test database: {err:#}"));

        TestDatabase { db }
    }

    /// Direct handle for seeding data the API itself would never write
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The full application wired against this database
    pub fn router(&self, storage: TodoStorage) -> Router {
        let shared_data = Arc::new(SharedData {
            ext_cxn: ExternalConnectivity::new(self.db.clone()),
        });

        build_router(storage, shared_data)
    }

    /// Removes the database. Failures are only reported since the test already ran.
    pub async fn drop_db(self) {
        let db_name = self.db.name().to_owned();
        if let Err(err) = self.db.drop().await {
            println!("Failed to drop test database {db_name}, please remove it manually. Error: {err}");
        }
    }
}

/// Sends one request through the router, optionally with a JSON body
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json_body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("test request should be well formed");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("router should always produce a response")
}
