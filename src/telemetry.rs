use crate::configuration::LogFormat;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt, fmt::MakeWriter, layer::SubscriberExt};

/// Compose multiple layers into a `tracing`'s subscriber.
///
/// `RUST_LOG` takes precedence over `env_filter`. Output goes to `sink`,
/// either as plain text or as Bunyan-formatted JSON lines. Plain text is only
/// coloured when `ansi` is set.
pub fn get_subscriber<Sink>(
    env_filter: String,
    format: LogFormat,
    ansi: bool,
    sink: Sink,
) -> Box<dyn Subscriber + Send + Sync>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    match format {
        LogFormat::Bunyan => {
            let app_name = format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            let formatting_layer = BunyanFormattingLayer::new(app_name, sink);
            Box::new(
                Registry::default()
                    .with(env_filter)
                    .with(JsonStorageLayer)
                    .with(formatting_layer),
            )
        }
        LogFormat::Pretty => Box::new(
            Registry::default()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(ansi)
                        .with_writer(sink),
                ),
        ),
    }
}

/// Register a subscriber as global default to process span data.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) {
    LogTracer::init().expect("Failed to set logger");
    set_global_default(subscriber).expect("Failed to set subscriber");
}
