//! Subscriber setup for custctl
//!
//! Console output is compact and filtered by `RUST_LOG` (falling back to
//! `info`, or `debug` with `--debug`). Built with the `telemetry` feature,
//! `--otel` adds an OTLP span exporter; its endpoint comes from
//! `OTEL_EXPORTER_OTLP_ENDPOINT`.

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging flags taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub debug: bool,
    pub otel: bool,
}

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(opts: LogOptions) -> Result<()> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(opts.debug)
        .compact();
    let subscriber = tracing_subscriber::registry()
        .with(filter(opts.debug))
        .with(console);

    #[cfg(feature = "telemetry")]
    if opts.otel {
        subscriber
            .with(otlp_layer()?)
            .try_init()
            .map_err(|err| anyhow!(err))?;
        tracing::info!("exporting spans over OTLP");
        return Ok(());
    }

    subscriber.try_init().map_err(|err| anyhow!(err))?;

    #[cfg(not(feature = "telemetry"))]
    if opts.otel {
        tracing::warn!("--otel ignored: built without the telemetry feature");
    }

    Ok(())
}

#[cfg(feature = "telemetry")]
fn otlp_layer<S>(
) -> Result<tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new("service.name", "custctl")]))
        .build();
    let tracer = provider.tracer("custctl");

    // Kept globally so `flush` can drain it on exit
    let _ = opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}

/// Flush buffered spans. No-op without the `telemetry` feature.
pub fn flush() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}
