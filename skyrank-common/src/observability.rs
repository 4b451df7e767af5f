//! Shared observability helpers for the binary and integration tests.
//!
//! [`init_logging`] installs the global `tracing` subscriber once. Events go
//! to an optional daily-rolling file and/or `stderr`; `stdout` is never used
//! because it carries ranking output. Later calls are no-ops that hand back
//! the originally resolved log file path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

const LOG_DIR_ENV: &str = "SKYRANK_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical name of the component (used for defaults and file names).
    pub app_name: &'static str,
    /// Optional explicit directory for log output. If `None`, we consult
    /// `SKYRANK_LOG_DIR` and finally fall back to the platform data dir.
    pub log_dir: Option<PathBuf>,
    /// Whether to write the rolling log file at all.
    pub file: bool,
    /// Whether to duplicate events to `stderr`.
    pub emit_stderr: bool,
    /// Preferred log encoding.
    pub format: LogFormat,
    /// Default filter applied when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "skyrank",
            log_dir: None,
            file: true,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Where events end up once the log directory has been checked.
#[derive(Debug)]
struct Sinks {
    file_dir: Option<PathBuf>,
    stderr: bool,
    /// Why the file sink was abandoned, if it was.
    fallback: Option<String>,
}

/// An unusable log directory downgrades to stderr-only logging rather than
/// failing the caller.
fn plan_sinks(config: &LogConfig) -> Sinks {
    if !config.file {
        return Sinks {
            file_dir: None,
            stderr: config.emit_stderr,
            fallback: None,
        };
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    match std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))
    {
        Ok(()) => Sinks {
            file_dir: Some(dir),
            stderr: config.emit_stderr,
            fallback: None,
        },
        Err(e) => Sinks {
            file_dir: None,
            stderr: true,
            fallback: Some(format!("{e:#}")),
        },
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the log file path for the current day, or `None` when the file
/// sink is disabled or its directory could not be created.
pub fn init_logging(config: LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let sinks = plan_sinks(&config);
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_path = None;

    if let Some(dir) = &sinks.file_dir {
        let file_name = format!("{}.log", config.app_name);
        let today = Local::now().format("%Y-%m-%d").to_string();
        file_path = Some(dir.join(format!("{file_name}.{today}")));

        let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, file_name));
        let _ = LOG_GUARD.set(guard);

        layers.push(match config.format {
            LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        });
    }

    if sinks.stderr {
        layers.push(match config.format {
            LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        });
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    if let Some(reason) = &sinks.fallback {
        tracing::warn!(reason = %reason, "logging.file_sink_disabled");
    }

    let _ = LOG_PATH.set(file_path.clone());
    Ok(file_path)
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return expand_home(Path::new(&env_dir));
    }

    default_data_dir(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(app_name))
        .unwrap_or_else(|| PathBuf::from(".").join(app_name))
}
