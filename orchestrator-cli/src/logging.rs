//! Tracing setup: stdout, plus a daily file under `<root>/logs/`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use orchestrator_core::paths::{daily_log_path, logs_dir};

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// With `to_file`, events are also appended (without colors) to
/// `logs/orchestrator_YYYYMMDD.log`. If that file cannot be opened the
/// command still runs with stdout logging only.
pub fn init(root: &Path, to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file, file_error) = if to_file {
        match open_daily_log(root) {
            Ok(file) => (Some(file), None),
            Err(err) => (None, Some(err)),
        }
    } else {
        (None, None)
    };

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();

    if let Some(err) = file_error {
        tracing::warn!(error = %err, "file logging disabled");
    }
}

fn open_daily_log(root: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(logs_dir(root))?;
    let stamp = Local::now().format("%Y%m%d").to_string();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(daily_log_path(root, &stamp))
}
