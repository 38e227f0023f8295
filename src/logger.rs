use crate::error::Error;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Route tracing output to a file. The terminal belongs to the TUI, so nothing
/// may be written to stdout while it is running.
pub fn init(path: &Path) -> Result<WorkerGuard, Error> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Logger(format!("Invalid log file path: {}", path.display())))?;

    std::fs::create_dir_all(&directory)?;

    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, repeated init).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(guard)
}
