//! Structured logging.
//!
//! Provides configurable logging with support for:
//! - JSON and pretty formats
//! - Stdout and file outputs with rotation
//! - Masking of credentials before they are written

mod config;
mod writer;

pub use config::{LogConfig, LogFormat, LogOutput, RotationConfig};
pub use writer::{MaskingMakeWriter, MaskingWriter};

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Initialize the global logging system.
///
/// Returns guards that must be kept alive for the duration of the program
/// so buffered file output is flushed.
///
/// # Example
///
/// ```no_run
/// use scpi_telemetry::logging::{init_logging, LogConfig};
///
/// let _guards = init_logging(&LogConfig::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<Vec<WorkerGuard>, LoggingError> {
    config.validate()?;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let mut guards = Vec::new();
    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

    for output in &config.outputs {
        match output {
            LogOutput::Stdout => {
                layers.push(fmt_layer(config, masking(config, std::io::stdout), true));
            }
            LogOutput::File {
                path,
                file_name,
                rotation,
            } => {
                std::fs::create_dir_all(path)?;
                let appender = match rotation.unwrap_or(RotationConfig::Daily) {
                    RotationConfig::Hourly => tracing_appender::rolling::hourly(path, file_name),
                    RotationConfig::Daily => tracing_appender::rolling::daily(path, file_name),
                    RotationConfig::Never => tracing_appender::rolling::never(path, file_name),
                };
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                layers.push(fmt_layer(config, masking(config, non_blocking), false));
                guards.push(guard);
            }
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guards)
}

fn masking<M>(config: &LogConfig, inner: M) -> MaskingMakeWriter<M> {
    if config.mask_sensitive {
        MaskingMakeWriter::new(inner)
    } else {
        MaskingMakeWriter::passthrough(inner)
    }
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_ids(config.include_thread_id)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info)
        .with_span_events(if config.include_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    match config.format {
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

impl LogConfig {
    /// Checks the filter directive and output targets.
    pub fn validate(&self) -> Result<(), LoggingError> {
        if self.level.trim().is_empty() {
            return Err(LoggingError::InvalidConfig("level must not be empty".to_string()));
        }
        EnvFilter::try_new(&self.level)?;

        if self.outputs.is_empty() {
            return Err(LoggingError::InvalidConfig(
                "at least one output is required".to_string(),
            ));
        }
        for output in &self.outputs {
            if let LogOutput::File { path, file_name, .. } = output
                && (path.trim().is_empty() || file_name.trim().is_empty())
            {
                return Err(LoggingError::InvalidConfig(
                    "file output needs a path and a file name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    /// The filter directive does not parse
    #[error("Invalid log level: {0}")]
    InvalidLevel(#[from] tracing_subscriber::filter::ParseError),

    /// Invalid configuration
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(String),

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
