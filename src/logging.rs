/// File logging.
///
/// The terminal is the display, so nothing is written to stdout. Events go
/// to a daily-rolling file under `logs/` through a non-blocking writer.
/// Filter comes from `MATRIX_HANDHELD_LOG`, falling back to
/// `matrix_handheld=info,warn`.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_FILTER: &str = "MATRIX_HANDHELD_LOG";
pub const ENV_LOG_DIR: &str = "MATRIX_HANDHELD_LOG_DIR";
const DEFAULT_FILTER: &str = "matrix_handheld=info,warn";
const LOG_FILE: &str = "matrix-handheld.log";

#[derive(Clone, Debug, PartialEq)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub filter: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(ENV_LOG_DIR).ok(),
            std::env::var(ENV_FILTER).ok(),
        )
    }

    fn from_vars(dir: Option<String>, filter: Option<String>) -> Self {
        LogSettings {
            dir: dir.filter(|d| !d.is_empty()).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("logs")),
            filter: filter.filter(|f| !f.trim().is_empty()).unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }
}

/// Install the global subscriber and the panic hook. Failing to create
/// the log directory leaves logging disabled; the app still runs.
///
/// Hold the returned guard until exit: dropping it flushes queued lines.
pub fn init() -> Option<WorkerGuard> {
    init_with(LogSettings::from_env())
}

fn init_with(settings: LogSettings) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(&settings.dir) {
        eprintln!("Warning: could not create log directory {}: {e}", settings.dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(&settings.dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&settings.filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true)
        .with_ansi(false);

    if tracing_subscriber::registry().with(filter).with(file_layer).try_init().is_err() {
        return None;
    }

    tracing::info!(
        dir = %settings.dir.display(),
        filter = %settings.filter,
        version = env!("CARGO_PKG_VERSION"),
        "logging initialized"
    );

    install_panic_hook();

    Some(guard)
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        tracing::error!(%location, %message, "panic");
        default_hook(info);
    }));
}
