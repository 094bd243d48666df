//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional JSON formatting and file output
///
/// `log_level` is an `EnvFilter` directive such as `info` or
/// `quote_server=debug,tower_http=info`. File output rolls daily.
pub fn init_logger(log_level: &str, json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match (json, log_dir.and_then(file_appender)) {
        (true, Some(appender)) => subscriber.json().with_writer(appender).init(),
        (true, None) => subscriber.json().init(),
        (false, Some(appender)) => subscriber.with_ansi(false).with_writer(appender).init(),
        (false, None) => subscriber.init(),
    }
}

fn file_appender(dir: &str) -> Option<RollingFileAppender> {
    let log_path = Path::new(dir);
    if let Err(e) = std::fs::create_dir_all(log_path) {
        eprintln!("Cannot create log directory {dir}: {e}, logging to stdout");
        return None;
    }
    Some(tracing_appender::rolling::daily(log_path, "quote-server"))
}
