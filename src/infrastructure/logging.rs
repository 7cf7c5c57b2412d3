use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::DomainError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// Console output goes to stderr, leaving stdout to answers. It honours
/// `RUST_LOG` and falls back to the configured level.
/// When `error_log_dir` is set, errors are also appended to a dated file there.
pub fn init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = console_layer(config, filter, std::io::stderr);

    let mut layers: Vec<BoxedLayer> = vec![console];

    let error_log = match config.error_log_dir.as_deref() {
        Some(dir) => {
            let (path, file) = open_error_log(dir)?;
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::ERROR)
                    .boxed(),
            );
            Some(path)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| DomainError::configuration(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!("Logging initialized with level: {}", config.level);
    if let Some(path) = error_log {
        tracing::debug!("Writing errors to {}", path.display());
    }

    Ok(())
}

fn console_layer<W>(config: &LoggingConfig, filter: EnvFilter, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed(),
    }
}

/// Path of today's error log inside `dir`
pub fn error_log_path(dir: &Path) -> PathBuf {
    let date = chrono::Local::now().format("%Y%m%d");
    dir.join(format!("chat_errors_{}.log", date))
}

fn open_error_log(dir: &Path) -> Result<(PathBuf, File), DomainError> {
    fs::create_dir_all(dir).map_err(|e| {
        DomainError::configuration(format!(
            "Failed to create log directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let path = error_log_path(dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            DomainError::configuration(format!(
                "Failed to open error log {}: {}",
                path.display(),
                e
            ))
        })?;

    Ok((path, file))
}
