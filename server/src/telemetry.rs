//! Logging setup.
//!
//! Console logging is always on, filtered by `RUST_LOG` (default `info`).
//! Built with the `otel` feature and with OTEL_EXPORTER_OTLP_ENDPOINT set and
//! reachable, traces and logs are also sent to the collector.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_console() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize telemetry with optional OpenTelemetry export.
pub fn init_telemetry() {
    let Some(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        init_console();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return;
    };

    #[cfg(feature = "otel")]
    if otel::is_reachable(&endpoint) {
        match otel::init(&endpoint, env_filter()) {
            Ok(service_name) => {
                tracing::info!(
                    "OpenTelemetry enabled, exporting traces and logs to {} as {}",
                    endpoint,
                    service_name
                );
            }
            Err(e) => {
                init_console();
                tracing::warn!(
                    error = %e,
                    "Failed to set up OpenTelemetry export, using console logging only"
                );
            }
        }
        return;
    }

    init_console();
    if cfg!(feature = "otel") {
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
    } else {
        tracing::info!(
            "OpenTelemetry endpoint {} ignored, built without the otel feature",
            endpoint
        );
    }
}

#[cfg(feature = "otel")]
mod otel {
    use opentelemetry::trace::TracerProvider;
    use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::logs::SdkLoggerProvider;
    use opentelemetry_sdk::trace::SdkTracerProvider;
    use std::net::{TcpStream, ToSocketAddrs};
    use std::time::Duration;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    /// Quick TCP check to see if the collector is up (resolve hostname first)
    pub(super) fn is_reachable(endpoint: &str) -> bool {
        let host_port = endpoint
            .trim_start_matches("http://")
            .trim_start_matches("https://");

        host_port
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
            .unwrap_or(false)
    }

    /// Installs the global subscriber with OTLP trace and log export.
    /// Returns the service name reported to the collector.
    pub(super) fn init(
        endpoint: &str,
        env_filter: EnvFilter,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let service_name =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "recipe-server".to_string());

        let resource = opentelemetry_sdk::Resource::builder()
            .with_service_name(service_name.clone())
            .build();

        let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let trace_provider = SdkTracerProvider::builder()
            .with_batch_exporter(trace_exporter)
            .with_resource(resource.clone())
            .build();

        let tracer = trace_provider.tracer("recipe-server");
        opentelemetry::global::set_tracer_provider(trace_provider);

        let log_exporter = opentelemetry_otlp::LogExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let log_provider = SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .with(OpenTelemetryTracingBridge::new(&log_provider))
            .init();

        Ok(service_name)
    }
}
