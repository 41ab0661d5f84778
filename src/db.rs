use anyhow::Context;
use backoff::backoff::Constant;
use backoff::future::retry_notify;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;
use tracing::{info, warn};

/// How long the driver looks for a usable server before an operation fails
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Pause between connection attempts while the database is unreachable at startup
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Database used when neither the configuration nor the connection string names one
pub const FALLBACK_DATABASE: &str = "test";

const APP_NAME: &str = "todo-rest";

/// Builds a MongoDB client for the given connection string. The driver connects lazily, so
/// this only fails when the connection string itself is unusable.
pub async fn connect_mongo(
    uri: &str,
    database_name: Option<&str>,
) -> Result<(Client, Database), anyhow::Error> {
    let mut client_options = ClientOptions::parse(uri)
        .await
        .context("parsing the MongoDB connection string")?;
    client_options.app_name = Some(APP_NAME.to_owned());
    client_options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
    client_options.connect_timeout = Some(SERVER_SELECTION_TIMEOUT);

    let client = Client::with_options(client_options).context("creating the MongoDB client")?;
    let database = match database_name {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
    };

    Ok((client, database))
}

pub async fn ping(db: &Database) -> Result<(), mongodb::error::Error> {
    db.run_command(doc! { "ping": 1 }, None).await?;
    Ok(())
}

/// Pings the database until it answers, waiting [CONNECT_RETRY_DELAY] between attempts.
pub async fn wait_for_database(db: &Database) {
    wait_for_database_with_delay(db, CONNECT_RETRY_DELAY).await
}

async fn wait_for_database_with_delay(db: &Database, delay: Duration) {
    info!("Connecting to MongoDB database {}", db.name());

    let connected: Result<(), mongodb::error::Error> = retry_notify(
        Constant::new(delay),
        || async { ping(db).await.map_err(backoff::Error::transient) },
        |err, retry_in: Duration| {
            warn!(
                "MongoDB connection error, retrying in {}s: {err}",
                retry_in.as_secs()
            )
        },
    )
    .await;

    // Constant backoff never gives up, so the only way out is a successful ping
    if connected.is_ok() {
        info!("MongoDB connected");
    }
}
