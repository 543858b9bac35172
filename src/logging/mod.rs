//! Structured logging for analysis runs
//!
//! Console and JSON-file output through `tracing`, per-component levels, and
//! a per-thread correlation id that ties every span of one analysis run
//! together.

pub mod config;
pub mod spans;

use anyhow::Result;
use std::cell::Cell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

pub use config::LoggingConfig;
pub use spans::AnalysisSpan;

thread_local! {
    static RUN_ID: Cell<Option<Uuid>> = const { Cell::new(None) };
}

/// Keeps the background file writer alive; logs are flushed when dropped
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

const LOG_FILE_PREFIX: &str = "oxdc-analysis.log";

/// Install the global subscriber: stderr text and/or daily-rolled JSON files.
///
/// `RUST_LOG` overrides the configured levels. Fails if a global subscriber
/// is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    config.validate().map_err(anyhow::Error::msg)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directives()))?;

    let console = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(config.include_file_location)
            .with_file(config.include_file_location)
    });

    let (file, file_guard) = match &config.log_directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .try_init()?;

    tracing::debug!(?config, "Logging initialised");
    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

pub fn set_correlation_id(id: Uuid) {
    RUN_ID.with(|slot| slot.set(Some(id)));
}

/// Correlation id of the run executing on this thread, if any
pub fn get_correlation_id() -> Option<Uuid> {
    RUN_ID.with(Cell::get)
}

/// Start a new run on this thread and return its id
pub fn new_correlation_id() -> Uuid {
    let id = Uuid::new_v4();
    set_correlation_id(id);
    id
}

pub fn clear_correlation_id() {
    RUN_ID.with(|slot| slot.set(None));
}

/// Correlation id bound to a lexical scope; the previous id is restored on drop
pub struct CorrelationScope {
    id: Uuid,
    previous: Option<Uuid>,
}

impl CorrelationScope {
    pub fn new() -> Self {
        Self::enter(Uuid::new_v4())
    }

    pub fn enter(id: Uuid) -> Self {
        let previous = get_correlation_id();
        set_correlation_id(id);
        Self { id, previous }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for CorrelationScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CorrelationScope {
    fn drop(&mut self) {
        RUN_ID.with(|slot| slot.set(self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_id_lifecycle() {
        clear_correlation_id();
        assert_eq!(get_correlation_id(), None);

        let id = new_correlation_id();
        assert_eq!(get_correlation_id(), Some(id));
        clear_correlation_id();
        assert_eq!(get_correlation_id(), None);
    }

    #[test]
    fn test_nested_scopes_restore_outer_id() {
        clear_correlation_id();
        let outer = CorrelationScope::new();
        {
            let inner = CorrelationScope::new();
            assert_eq!(get_correlation_id(), Some(inner.id()));
        }
        assert_eq!(get_correlation_id(), Some(outer.id()));
        drop(outer);
        assert_eq!(get_correlation_id(), None);
    }

    #[test]
    fn test_other_threads_do_not_share_the_id() {
        let _scope = CorrelationScope::new();
        let seen = std::thread::spawn(get_correlation_id).join().unwrap();
        assert_eq!(seen, None);
    }

    #[test]
    fn test_invalid_config_rejected_before_init() {
        let config = LoggingConfig {
            global_level: "chatty".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).is_err());
    }

    #[test]
    fn test_logging_config_init() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            log_directory: Some(temp_dir.path().join("logs")),
            ..LoggingConfig::default()
        };

        // Only one global subscriber may exist per process
        let _guard = init_logging(&config).unwrap();
        assert!(temp_dir.path().join("logs").exists());
    }
}
