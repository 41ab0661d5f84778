use anyhow::Context;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use todo_rest::app_env::AppConfig;
use todo_rest::{SharedData, db, logging, persistence, routes};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Starting without a .env file");
    }

    let config = AppConfig::from_env()?;
    let otel_exporters = config
        .otel
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    let env_filter = logging::init_env_filter().context("reading the log level filter")?;
    let telemetry = logging::setup_logging_and_tracing(env_filter, otel_exporters);

    let (mongo_client, database) =
        db::connect_mongo(&config.mongodb_uri, config.database_name.as_deref()).await?;
    db::wait_for_database(&database).await;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(database),
    });
    let router = routes::build_router(shared_data);

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("binding to {address}"))?;
    info!("Server is running on port {}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Closing MongoDB connections");
    mongo_client.shutdown().await;
    telemetry.shutdown();

    Ok(())
}

/// Resolves once the process is asked to stop via Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
