//! Tracing subscriber setup

use crate::cli::json_log_behaviour::JsonLogBehaviour;
use eyre::eyre;
use std::fs::File;
use std::sync::Mutex;
use tracing::Level;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber: human-readable logs on stderr, plus JSON lines in a
/// file when requested. `RUST_LOG` directives refine `level`.
///
/// # Errors
///
/// Returns an error if the JSON log file cannot be created or a subscriber is already set.
pub fn init_tracing(level: Level, json_log_behaviour: JsonLogBehaviour) -> eyre::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false);

    let json_layer = match json_log_behaviour.file() {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(path)
                .map_err(|e| eyre!("Failed to create log file {}: {}", path.display(), e))?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize tracing: {}", e))?;

    if let Some(path) = json_log_behaviour.file() {
        debug!(path = %path.display(), "Writing JSON logs");
    }
    Ok(())
}
