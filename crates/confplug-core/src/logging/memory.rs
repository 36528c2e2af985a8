//! In-memory logger

use parking_lot::Mutex;

use super::traits::{Logger, LogLevel};

/// A single recorded log message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that keeps every message, mostly useful in tests
///
/// # Example
///
/// ```
/// use confplug_core::logging::{Logger, LogLevel, MemoryLogger};
///
/// let logger = MemoryLogger::new();
/// logger.warn("two providers matched");
/// assert!(logger.contains(LogLevel::Warn, "two providers"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Whether any entry at `level` contains `needle`
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let logger = MemoryLogger::new();
        logger.debug("scanning");
        logger.error("failed");

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Debug);
        assert_eq!(entries[1].message, "failed");

        logger.clear();
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_macros_format_arguments() {
        let logger = MemoryLogger::new();
        crate::log_info!(logger, "found {} manifests", 3);
        assert!(logger.contains(LogLevel::Info, "found 3 manifests"));
    }
}
