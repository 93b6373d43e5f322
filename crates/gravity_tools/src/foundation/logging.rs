//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default level filter
///
/// `RUST_LOG` still takes precedence when set. Unknown level names fall back to `info`.
/// Fails when a logger is already installed.
pub fn init_with_level(level: &str) -> Result<(), log::SetLoggerError> {
    let filter = level.parse::<log::LevelFilter>().unwrap_or(log::LevelFilter::Info);

    env_logger::Builder::new()
        .filter_level(filter)
        .parse_env("RUST_LOG")
        .try_init()
}
