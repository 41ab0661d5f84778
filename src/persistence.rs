pub mod db_todo_driven_ports;

use crate::external_connections;
use crate::external_connections::ConnectionHandle;
use mongodb::Database;

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: Database,
}

impl ExternalConnectivity {
    pub fn new(db: Database) -> Self {
        ExternalConnectivity { db }
    }

    /// Asks the database whether it's reachable
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        crate::db::ping(&self.db).await
    }
}

/// A borrowed handle to the database owned by [ExternalConnectivity]. The driver pools
/// connections internally, so there's nothing to acquire here.
pub struct DatabaseHandle<'cxn> {
    db: &'cxn Database,
}

impl ConnectionHandle for DatabaseHandle<'_> {
    fn database(&self) -> &Database {
        self.db
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    type DbHandle<'cxn> = DatabaseHandle<'cxn>;

    async fn database_cxn(&mut self) -> Result<DatabaseHandle<'_>, anyhow::Error> {
        Ok(DatabaseHandle { db: &self.db })
    }
}
