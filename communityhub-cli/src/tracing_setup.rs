//! Log and trace output for the communityhub binary
//!
//! Without `RUST_LOG` the filter follows `--debug` for this service's own
//! crates and the HTTP trace layer, leaves dependencies at `info`, and holds
//! sqlx at `warn` so debug runs are not flooded with every statement.
//! `RUST_LOG` replaces the default filter entirely.
//!
//! With the `telemetry` feature and `--otel`, spans are also exported over
//! OTLP (`OTEL_EXPORTER_OTLP_ENDPOINT`, default `http://localhost:4317`).

use anyhow::{anyhow, Result};
use communityhub_server::SERVICE_NAME;
use tracing_subscriber::EnvFilter;

/// Crates whose level follows `--debug`
const SERVICE_TARGETS: [&str; 3] = ["communityhub", "communityhub_server", "tower_http"];

/// Statement logging stays quiet even under `--debug`
const SQLX_DIRECTIVE: &str = "sqlx=warn";

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
    pub otel: bool,
}

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };

    let mut directives = vec!["info".to_string()];
    directives.extend(SERVICE_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.push(SQLX_DIRECTIVE.to_string());
    directives.join(",")
}

fn env_filter(debug: bool) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            EnvFilter::try_new(&value).map_err(|e| anyhow!("invalid RUST_LOG '{}': {}", value, e))
        }
        _ => Ok(EnvFilter::try_new(default_directives(debug))?),
    }
}

fn init_console(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.debug)?)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(feature = "telemetry")]
fn init_with_otel(config: &TracingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![
            KeyValue::new("service.name", SERVICE_NAME),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]))
        .build();

    let telemetry = tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME));
    // The global provider keeps the exporter alive until shutdown
    let _ = opentelemetry::global::set_tracer_provider(provider);

    tracing_subscriber::registry()
        .with(env_filter(config.debug)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(config.debug)
                .compact(),
        )
        .with(telemetry)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(endpoint = %endpoint, service = SERVICE_NAME, "exporting traces over OTLP");
    Ok(())
}

/// Flush pending spans before exit.
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Install the global subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if config.otel {
        return init_with_otel(config);
    }

    init_console(config)?;
    if config.otel {
        tracing::warn!("--otel requested but built without the telemetry feature");
    }
    Ok(())
}
