//! # Cascade Log
//!
//! Logging setup shared by the Cascade binaries and test harnesses.
//!
//! Library crates only emit events through [`tracing`]; installing a
//! subscriber is the job of whoever owns `main`.
//!
//! ```rust,no_run
//! fn main() -> Result<(), cascade_log::LogError> {
//!     let _guard = cascade_log::auto_init()?;
//!     tracing::info!(jobs = 3, "resolving parameters");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, WriterConfig};
pub use error::{LogError, LogResult};

// Re-export tracing macros
pub use tracing::{debug, error, info, instrument, span, trace, warn};

/// Auto-detect and initialize the best logging configuration.
///
/// `CASCADE_LOG` / `RUST_LOG` win when set; otherwise debug builds get the
/// development preset and release builds the production preset.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var("CASCADE_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration.
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests.
///
/// Safe to call from many tests: when a global subscriber already exists the
/// call is a no-op.
pub fn init_test() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }
    match init_with(Config::test()) {
        // Another test thread won the race.
        Err(LogError::AlreadyInitialized) => Ok(LoggerGuard::noop()),
        other => other,
    }
}
