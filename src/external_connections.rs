use mongodb::Database;

/// Hands out access to the external systems the service talks to. Driven adapters receive one
/// of these per operation so business logic never holds a store handle of its own.
pub trait ExternalConnectivity: Sync {
    type DbHandle<'cxn>: ConnectionHandle
    where
        Self: 'cxn;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// A live handle to the document database
pub trait ConnectionHandle {
    fn database(&self) -> &Database;
}
