//! Tracing subscriber setup for the server binary

use std::error::Error;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Name prefix of the daily log files
const LOG_FILE_PREFIX: &str = "feedboard.log";

/// The filter used when `RUST_LOG` is not set
pub fn default_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug,tower_http=debug,axum=debug")
    } else {
        EnvFilter::new("info,tower_http=info,axum=info")
    }
}

/// Initializes the global tracing subscriber
///
/// Respects `RUST_LOG` if set. Events always go to stdout; when `log_dir` is
/// given they are also appended to a daily-rolling file there. The returned
/// guard flushes the file writer and must be kept alive for as long as the
/// server runs.
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(
    format: LogFormat,
    log_dir: Option<&Path>,
    debug: bool,
) -> Result<Option<WorkerGuard>, Box<dyn Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug));

    let (writer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (file, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(io::stdout.and(file)), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stdout), None),
    };

    let builder = fmt().with_env_filter(env_filter).with_writer(writer);
    match format {
        LogFormat::Human => builder.compact().try_init()?,
        LogFormat::Json => builder.json().with_current_span(true).try_init()?,
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(false).to_string().starts_with("info"));
        assert!(default_filter(true).to_string().starts_with("debug"));
    }

    #[test]
    fn test_logging_installs_once_with_file_guard() {
        let dir = tempdir().unwrap();
        let guard = init_logging(LogFormat::Json, Some(dir.path()), false).unwrap();
        assert!(guard.is_some());

        // a second global subscriber is refused
        assert!(init_logging(LogFormat::Human, None, false).is_err());
    }
}
