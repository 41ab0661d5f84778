use crate::app_env;
use crate::app_env::OtelEndpoints;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, Subscriber, debug, error, field, info_span, warn};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::filter::FromEnvError;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-rest";

/// OpenTelemetry providers which export spans and metrics in the background
pub struct OtelExporters {
    tracer_provider: TracerProvider,
    meter_provider: SdkMeterProvider,
}

/// Keeps exporters alive for the life of the process. Call [TelemetryGuard::shutdown] before
/// exiting so buffered spans and metrics get flushed.
pub struct TelemetryGuard {
    exporters: Option<OtelExporters>,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        let Some(exporters) = self.exporters else {
            return;
        };

        if let Err(err) = exporters.tracer_provider.shutdown() {
            warn!("Span exporter did not shut down cleanly: {err}");
        }
        if let Err(err) = exporters.meter_provider.shutdown() {
            warn!("Metric exporter did not shut down cleanly: {err}");
        }
    }
}

/// Wraps every request in a span carrying its method, path and eventual status, continuing any
/// trace the caller propagated through W3C trace context headers.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                let req_span = info_span!(
                    "request",
                    method = request.method().as_str(),
                    path = request.uri().path(),
                    response_status = field::Empty,
                    latency_ms = field::Empty,
                );

                req_span.set_parent(global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                }));

                req_span
            })
            .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                span.record("response_status", field::display(response.status()));
                span.record("latency_ms", latency.as_millis() as u64);
                debug!("request processing complete");
            })
            .on_failure(
                |failure: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {failure}");
                },
            ),
    )
}

/// Builds OpenTelemetry exporters which ship spans and metrics to OTLP gRPC endpoints
/// (typically an http://localhost:4317 collector sidecar)
pub fn init_exporters(endpoints: &OtelEndpoints) -> Result<OtelExporters, anyhow::Error> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.spans.as_str())
        .build()
        .context("building the span exporter")?;
    let meter_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.metrics.as_str())
        .build()
        .context("building the metric exporter")?;

    let metrics_reader = PeriodicReader::builder(meter_export, runtime::Tokio).build();
    let service_resource = Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(service_resource.clone())
        .build();
    let meter_provider = SdkMeterProvider::builder()
        .with_reader(metrics_reader)
        .with_resource(service_resource)
        .build();

    Ok(OtelExporters {
        tracer_provider,
        meter_provider,
    })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> Result<EnvFilter, FromEnvError> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
}

/// JSON formatted log lines on stdout, filtered by [env_filter]
fn json_stdout_layer<S>(env_filter: EnvFilter) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_filter(env_filter)
}

/// Installs the global subscriber: JSON logs on stdout filtered by [env_filter], plus span and
/// metric export at the "debug" level when [otel_exporters] is provided.
pub fn setup_logging_and_tracing(
    env_filter: EnvFilter,
    otel_exporters: Option<OtelExporters>,
) -> TelemetryGuard {
    global::set_text_map_propagator(TraceContextPropagator::new());

    match otel_exporters {
        Some(exporters) => {
            let tracer = exporters.tracer_provider.tracer(SERVICE_NAME);
            registry()
                .with(LevelFilter::DEBUG)
                .with(OpenTelemetryLayer::new(tracer))
                .with(MetricsLayer::new(exporters.meter_provider.clone()))
                .with(json_stdout_layer(env_filter))
                .init();

            TelemetryGuard {
                exporters: Some(exporters),
            }
        }
        None => {
            registry()
                .with(LevelFilter::DEBUG)
                .with(json_stdout_layer(env_filter))
                .init();

            TelemetryGuard { exporters: None }
        }
    }
}
