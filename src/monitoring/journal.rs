/*!
 * Event Journal
 * Append-only, timestamped message log shared across components
 */

use crate::core::types::Tick;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

/// One journal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Simulated time of the event, when the caller knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<Tick>,
    pub message: String,
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (h, m, s) = self.timestamp.to_hms();
        write!(f, "[{:02}:{:02}:{:02}]", h, m, s)?;
        if let Some(tick) = self.tick {
            write!(f, " [t={}]", tick)?;
        }
        write!(f, " {}", self.message)
    }
}

/// Journal handle
///
/// Cloning shares the same underlying log. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message without a simulated timestamp
    pub fn log(&self, message: impl Into<String>) {
        self.push(None, message.into());
    }

    /// Append a message stamped with the simulated tick
    pub fn log_at(&self, tick: Tick, message: impl Into<String>) {
        self.push(Some(tick), message.into());
    }

    fn push(&self, tick: Option<Tick>, message: String) {
        info!(target: "journal", tick, "{}", message);
        self.entries.write().push(JournalEntry {
            timestamp: OffsetDateTime::now_utc(),
            tick,
            message,
        });
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.read().clone()
    }

    /// The most recent `n` entries, oldest first
    pub fn tail(&self, n: usize) -> Vec<JournalEntry> {
        let entries = self.entries.read();
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether any entry contains the given text
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.read().iter().any(|e| e.message.contains(needle))
    }
}
