//! Status notifications.
//!
//! Operations report progress and outcomes as one-line messages. The sink is
//! fire-and-forget: it never blocks and never fails.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::info;

/// Receiver of one-line status messages.
pub trait StatusSink {
    fn notify(&self, text: &str);
}

/// Sink that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn notify(&self, text: &str) {
        info!(status = %text, "status");
    }
}

/// Default number of history lines kept by [`StatusLog`].
const DEFAULT_HISTORY: usize = 50;

/// Shared status line with a bounded history.
///
/// Clones share the same log, so one clone can be handed to the network
/// service while another is read by the front end.
#[derive(Debug, Clone)]
pub struct StatusLog {
    inner: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// The most recent message, if any.
    pub fn latest(&self) -> Option<String> {
        self.lock().back().cloned()
    }

    /// All retained messages, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        // A poisoned log still holds valid strings.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for StatusLog {
    fn notify(&self, text: &str) {
        info!(status = %text, "status");
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log() {
        let log = StatusLog::new();
        assert_eq!(log.latest(), None);
        assert!(log.history().is_empty());
    }

    #[test]
    fn records_in_order() {
        let log = StatusLog::new();
        log.notify("one");
        log.notify("two");
        assert_eq!(log.latest().as_deref(), Some("two"));
        assert_eq!(log.history(), vec!["one", "two"]);
    }

    #[test]
    fn clones_share_history() {
        let log = StatusLog::new();
        let writer = log.clone();
        writer.notify("hello");
        assert_eq!(log.latest().as_deref(), Some("hello"));
    }

    #[test]
    fn history_is_bounded() {
        let log = StatusLog::with_capacity(2);
        log.notify("a");
        log.notify("b");
        log.notify("c");
        assert_eq!(log.history(), vec!["b", "c"]);
    }
}
