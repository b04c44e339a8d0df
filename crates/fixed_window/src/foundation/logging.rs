//! Logging utilities and the injectable log sink
//!
//! Engine code logs through the `log` facade. Window managers additionally take
//! a [`LogSink`] at construction so their lifecycle messages can be routed or
//! captured per instance instead of through a global singleton.

use std::cell::RefCell;
use std::rc::Rc;

pub use log::{debug, error, info, trace, warn, Level};

/// Target used for surface lifecycle messages
pub const SURFACE_LOG_TARGET: &str = "fixed_window::surface";

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with explicit filter directives
///
/// `filters` uses the `env_logger` syntax (`"info"`, `"fixed_window=debug"`).
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(filters: &str) {
    let result = env_logger::Builder::new()
        .parse_filters(filters)
        .format_timestamp_millis()
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}

/// Destination for per-instance lifecycle messages
pub trait LogSink {
    /// Record a single message at the given level
    fn log(&self, level: Level, message: &str);
}

/// Sink forwarding to the global `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogCrateSink {
    target: &'static str,
}

impl LogCrateSink {
    /// Forward messages under a custom target
    pub const fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogCrateSink {
    fn default() -> Self {
        Self::with_target(SURFACE_LOG_TARGET)
    }
}

impl LogSink for LogCrateSink {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: self.target, level, "{message}");
    }
}

/// Sink that keeps every message in memory
///
/// Clones share the same buffer, so a test can keep one clone and hand the
/// other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Rc<RefCell<Vec<(Level, String)>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded messages
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.borrow().clone()
    }

    /// Messages recorded at `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.records.borrow().iter().any(|(_, m)| m.contains(needle))
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, message: &str) {
        self.records.borrow_mut().push((level, message.to_string()));
    }
}
