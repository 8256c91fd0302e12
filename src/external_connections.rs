use mongodb::Database;

/// Represents the external systems driven adapters talk to. Business logic receives this
/// as an opaque handle and passes it along to driven ports, so those ports can be swapped
/// for in-memory implementations in tests.
pub trait ExternalConnectivity: Sync {
    /// Hands out a handle to the document database. Handles share the client's connection pool,
    /// so acquiring one is cheap.
    fn database_cxn(&self) -> Result<Database, anyhow::Error>;
}
