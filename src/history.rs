//! Command history tracking for debugging and diagnostics.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::dispatch::Action;

/// What happened to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A task was spawned for the command
    Dispatched,
    /// The command was discarded because another one was in flight
    Dropped,
    /// One try was handed to the hub
    Sent,
    /// A try failed and the remaining tries were abandoned
    Failed,
    /// All tries were handed to the hub
    Completed,
}

/// A recorded command event.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: EventKind,
    pub action: Action,
    /// 1-based try number, for `Sent` events
    pub attempt: Option<u32>,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Tracks what happened to the commands of one light.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    counts: HashMap<EventKind, usize>,
    last_error: Option<String>,
    start_time: Instant,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            last_error: None,
            start_time: Instant::now(),
            entries: VecDeque::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record(&mut self, kind: EventKind, action: Action) {
        self.push(kind, action, None);
    }

    pub fn record_attempt(&mut self, action: Action, attempt: u32) {
        self.push(EventKind::Sent, action, Some(attempt));
    }

    /// Records a failed try together with its error.
    pub fn record_error(&mut self, action: Action, error: &str) {
        self.last_error = Some(error.to_string());
        self.push(EventKind::Failed, action, None);
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of events of `kind` since creation or the last clear.
    pub fn count(&self, kind: EventKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            dispatched: self.count(EventKind::Dispatched),
            dropped: self.count(EventKind::Dropped),
            sent: self.count(EventKind::Sent),
            failed: self.count(EventKind::Failed),
            completed: self.count(EventKind::Completed),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }

    fn push(&mut self, kind: EventKind, action: Action, attempt: Option<u32>) {
        *self.counts.entry(kind).or_default() += 1;

        self.entries.push_back(HistoryEntry {
            kind,
            action,
            attempt,
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

/// Summary of command history for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub dispatched: usize,
    pub dropped: usize,
    pub sent: usize,
    pub failed: usize,
    pub completed: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_attempts() {
        let mut history = CommandHistory::new();
        history.record(EventKind::Dispatched, Action::TurnOn);
        history.record_attempt(Action::TurnOn, 1);
        history.record_attempt(Action::TurnOn, 2);

        assert_eq!(history.len(), 3);
        assert_eq!(history.count(EventKind::Sent), 2);
        let attempts: Vec<_> = history.entries().filter_map(|e| e.attempt).collect();
        assert_eq!(attempts, vec![1, 2]);
    }

    #[test]
    fn test_record_error() {
        let mut history = CommandHistory::new();
        history.record_error(Action::TurnOff, "hub send error: timeout");
        assert_eq!(history.last_error(), Some("hub send error: timeout"));
        assert_eq!(history.summary().failed, 1);
    }

    #[test]
    fn test_max_entries_keeps_counts() {
        let mut history = CommandHistory::with_max_entries(2);
        for attempt in 1..=5 {
            history.record_attempt(Action::TurnOn, attempt);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries().next().and_then(|e| e.attempt), Some(4));
        assert_eq!(history.summary().sent, 5);
    }

    #[test]
    fn test_clear() {
        let mut history = CommandHistory::new();
        history.record(EventKind::Dropped, Action::TurnOff);
        history.record_error(Action::TurnOff, "boom");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(
            history.summary(),
            HistorySummary {
                dispatched: 0,
                dropped: 0,
                sent: 0,
                failed: 0,
                completed: 0,
                total_entries: 0,
                last_error: None,
            }
        );
    }

    #[test]
    fn test_entry_serialization_skips_missing_attempt() {
        let mut history = CommandHistory::new();
        history.record(EventKind::Dispatched, Action::TurnOff);
        let json = serde_json::to_value(history.entries().next().unwrap()).unwrap();
        assert_eq!(json["kind"], "dispatched");
        assert_eq!(json["action"], "off");
        assert!(json.get("attempt").is_none());
    }
}
