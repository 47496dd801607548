use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, ResolvedOutputs};

pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Keeps the telemetry writer alive; dropping it flushes pending events.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Sends session and runner events as flat JSON lines to `telemetry.jsonl`
/// in the output directory. `RUST_LOG` overrides the configured level.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let dir = outputs.output_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory at {}", dir.display()))?;
    let telemetry_path = dir.join(TELEMETRY_FILE);
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    // block instead of dropping events when the buffer is full
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);
    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // ignored when a subscriber is already installed, as in tests
    let _ = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init();
    tracing::info!(target: "schafkopf_sim::runner", run_id, "telemetry started");

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn outputs(dir: &std::path::Path) -> ResolvedOutputs {
        ResolvedOutputs {
            deals_jsonl: dir.join("deals.jsonl"),
            summary_json: dir.join("nested/summary.json"),
        }
    }

    #[test]
    fn disabled_logging_touches_nothing() {
        let dir = tempdir().expect("temp dir");
        let guard = init_logging(&LoggingConfig::default(), &outputs(dir.path()), "unit")
            .expect("init");
        assert!(guard.is_none());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn telemetry_lands_next_to_the_summary() {
        let dir = tempdir().expect("temp dir");
        let logging = LoggingConfig {
            enable_structured: true,
            ..LoggingConfig::default()
        };
        let guard = init_logging(&logging, &outputs(dir.path()), "unit")
            .expect("init")
            .expect("enabled");
        assert_eq!(guard.telemetry_path, dir.path().join("nested").join(TELEMETRY_FILE));
        assert!(guard.telemetry_path.exists());
    }
}
