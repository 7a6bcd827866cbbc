use std::fmt;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[derive(Debug)]
pub enum Error {
    Logger {
        context: String,
        source: tracing_log::log::SetLoggerError,
    },
    Subscriber {
        context: String,
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Logger { context, source } => {
                write!(fmt, "Telemetry Logger: {context} | {source}")
            }
            Error::Subscriber { context, source } => {
                write!(fmt, "Telemetry Subscriber: {context} | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Logger { source, .. } => Some(source),
            Error::Subscriber { source, .. } => Some(source),
        }
    }
}

/// Sets up a tracing subscriber emitting bunyan formatted JSON lines.
///
/// `RUST_LOG`, if set, takes precedence over `env_filter`.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let bunyan_format = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(filter_layer)
        .with(JsonStorageLayer)
        .with(bunyan_format)
}

/// Register a subscriber as global default, and redirect `log` records to it.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), Error> {
    LogTracer::init().map_err(|err| Error::Logger {
        context: "Could not redirect log records".to_string(),
        source: err,
    })?;
    tracing::subscriber::set_global_default(subscriber).map_err(|err| Error::Subscriber {
        context: "Could not set global subscriber".to_string(),
        source: err,
    })
}
