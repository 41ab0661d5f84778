use thiserror::Error;

/// Connection string for the MongoDB deployment holding the todo collection
pub const MONGODB_URI: &str = "MONGODB_URI";
/// Optional database name. When unset, the database from [MONGODB_URI]'s path is used.
pub const MONGODB_DATABASE: &str = "MONGODB_DATABASE";
/// Port the HTTP server listens on
pub const PORT: &str = "PORT";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the {0} environment variable must be set")]
    Missing(&'static str),
    #[error("{0} is not a valid port number")]
    InvalidPort(String),
}

/// Where OpenTelemetry data gets shipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelEndpoints {
    pub spans: String,
    pub metrics: String,
}

/// Settings the service needs at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database_name: Option<String>,
    pub port: u16,
    pub otel: Option<OtelEndpoints>,
}

impl AppConfig {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mongodb_uri = read(MONGODB_URI).ok_or(ConfigError::Missing(MONGODB_URI))?;
        let port = match read(PORT) {
            Some(raw_port) => raw_port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw_port))?,
            None => DEFAULT_PORT,
        };
        let otel = match (read(OTEL_SPAN_EXPORT_URL), read(OTEL_METRIC_EXPORT_URL)) {
            (Some(spans), Some(metrics)) => Some(OtelEndpoints { spans, metrics }),
            _ => None,
        };

        Ok(AppConfig {
            mongodb_uri,
            database_name: read(MONGODB_DATABASE),
            port,
            otel,
        })
    }
}
