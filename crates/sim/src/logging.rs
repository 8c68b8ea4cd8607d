//! Logging setup for binaries driving the simulation.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform cache directory for simulation logs.
///
/// - macOS: `~/Library/Caches/activity-sim/logs`
/// - Linux: `~/.cache/activity-sim/logs` (or `$XDG_CACHE_HOME/activity-sim/logs`)
/// - Windows: `%LOCALAPPDATA%\activity-sim\logs`
/// - Fallback: `/tmp/activity-sim/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "activity-sim")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/activity-sim"))
        .join("logs")
}

/// Logs to stderr and, when `to_file` is set, to `<log_dir>/<session>/sim.log`.
///
/// Filtering follows `RUST_LOG`, with `info` as the floor.
pub fn setup_logging(session_id: Option<String>, to_file: bool) -> Result<Option<PathBuf>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let mut log_file = None;
    let file_layer = if to_file {
        let session_id = session_id.unwrap_or_else(|| {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();
            format!("session_{timestamp}")
        });
        let session_dir = log_dir().join(&session_id);
        std::fs::create_dir_all(&session_dir)?;

        let file_appender = tracing_appender::rolling::never(&session_dir, "sim.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        // Keep the writer alive for the rest of the process.
        std::mem::forget(guard);

        log_file = Some(session_dir.join("sim.log"));
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(path) = &log_file {
        tracing::info!("Log file: {}", path.display());
    }
    Ok(log_file)
}
