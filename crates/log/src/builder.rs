//! Logger builder implementation

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format, WriterConfig};
use crate::error::{LogError, LogResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard returned by a successful initialization.
///
/// Holding it keeps the root span entered for the lifetime of the program.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerGuard {
    pub(crate) fn noop() -> Self {
        Self { _root_span: None }
    }
}

/// Shared fmt layer settings; the format-specific tail is applied per arm.
macro_rules! fmt_layer {
    ($display:expr, $writer:expr) => {
        fmt::layer()
            .with_writer($writer)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
    };
}

fn make_writer(writer: WriterConfig) -> BoxMakeWriter {
    match writer {
        WriterConfig::Stderr => BoxMakeWriter::new(std::io::stderr),
        WriterConfig::Stdout => BoxMakeWriter::new(std::io::stdout),
    }
}

fn make_layer(config: &Config) -> BoxedLayer {
    let display = &config.display;
    let writer = make_writer(config.writer);

    match (config.format, display.time) {
        (Format::Pretty, true) => fmt_layer!(display, writer).pretty().boxed(),
        (Format::Pretty, false) => fmt_layer!(display, writer).pretty().without_time().boxed(),
        (Format::Compact, true) => fmt_layer!(display, writer).compact().boxed(),
        (Format::Compact, false) => fmt_layer!(display, writer)
            .compact()
            .without_time()
            .boxed(),
        (Format::Json, true) => fmt_layer!(display, writer)
            .json()
            .with_current_span(true)
            .flatten_event(display.flatten)
            .boxed(),
        (Format::Json, false) => fmt_layer!(display, writer)
            .json()
            .with_current_span(true)
            .flatten_event(display.flatten)
            .without_time()
            .boxed(),
    }
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber.
    ///
    /// # Errors
    ///
    /// - the level directive cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::filter(&self.config.level, e))?;

        Registry::default()
            .with(make_layer(&self.config))
            .with(filter)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)?;

        let root = tracing::info_span!("cascade");
        Ok(LoggerGuard {
            _root_span: Some(root.entered()),
        })
    }
}
