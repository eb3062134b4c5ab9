//! Session log - ordered, timestamped status messages shown to the user

use chrono::{DateTime, Local};

/// A single status message in the session log
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Unique within the session, used as a stable render key
    pub id: u64,
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    pub fn is_failure(&self) -> bool {
        self.message.to_lowercase().contains("failed")
    }
}

/// Append-only log; insertion order is display order
#[derive(Debug, Default)]
pub struct LogAccumulator {
    entries: Vec<LogEntry>,
    next_id: u64,
}

impl LogAccumulator {
    /// Append a message and return the id assigned to it
    pub fn append(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(LogEntry {
            id,
            timestamp: Local::now(),
            message: message.into(),
        });
        id
    }

    /// Empty the log. Ids keep counting so they are never reused.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = LogAccumulator::default();
        log.append("first");
        log.append("second");
        log.append("third");
        assert_eq!(log.messages(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ids_are_unique_across_reset() {
        let mut log = LogAccumulator::default();
        let a = log.append("a");
        let b = log.append("b");
        log.reset();
        assert!(log.is_empty());
        let c = log.append("c");
        assert_ne!(a, b);
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_failure_detection() {
        let mut log = LogAccumulator::default();
        log.append("processing started");
        log.append("processing failed: timeout of 60000ms exceeded");
        assert!(!log.entries()[0].is_failure());
        assert!(log.entries()[1].is_failure());
    }
}
