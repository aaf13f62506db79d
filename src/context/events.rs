// src/context/events.rs — Per-user tool usage log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A single tool interaction. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUsageEvent {
    pub tool_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub success: bool,
    /// Action-specific payload, stored opaquely and never parsed here.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ToolUsageEvent {
    pub fn new(tool_id: impl Into<String>, action: impl Into<String>, success: bool) -> Self {
        Self {
            tool_id: tool_id.into(),
            timestamp: Utc::now(),
            action: action.into(),
            success,
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Append-only, size-bounded usage history per user.
///
/// The cap is strict FIFO: when an append would exceed it, the oldest
/// entries are dropped. Evicted events are gone from this tier; durable
/// copies are the persistence adapter's concern.
pub struct UsageLog {
    max_events: usize,
    history: HashMap<String, VecDeque<ToolUsageEvent>>,
}

impl UsageLog {
    pub fn new(max_events: usize) -> Self {
        Self {
            max_events,
            history: HashMap::new(),
        }
    }

    /// Append an event for a user, evicting oldest-first past the cap.
    pub fn append(&mut self, user_id: &str, event: ToolUsageEvent) {
        let log = self.history.entry(user_id.to_string()).or_default();
        log.push_back(event);
        while log.len() > self.max_events {
            log.pop_front();
        }
    }

    /// All events for a user in insertion order. Unknown user yields empty.
    pub fn events<'a>(&'a self, user_id: &str) -> impl Iterator<Item = &'a ToolUsageEvent> + 'a {
        self.history.get(user_id).into_iter().flatten()
    }

    pub fn len(&self, user_id: &str) -> usize {
        self.history.get(user_id).map_or(0, |log| log.len())
    }

    pub fn is_empty(&self, user_id: &str) -> bool {
        self.len(user_id) == 0
    }

    /// Last `n` events for one tool, in chronological order.
    /// May return fewer than `n`.
    pub fn recent(&self, user_id: &str, tool_id: &str, n: usize) -> Vec<&ToolUsageEvent> {
        let matching: Vec<&ToolUsageEvent> = self
            .events(user_id)
            .filter(|e| e.tool_id == tool_id)
            .collect();
        let skip = matching.len().saturating_sub(n);
        matching.into_iter().skip(skip).collect()
    }

    /// Event count per tool, in first-seen order. A stable sort on the
    /// result breaks count ties by first appearance.
    pub fn tool_counts(&self, user_id: &str) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for event in self.events(user_id) {
            match counts.iter_mut().find(|(tool, _)| tool == &event.tool_id) {
                Some((_, n)) => *n += 1,
                None => counts.push((event.tool_id.clone(), 1)),
            }
        }
        counts
    }

    /// Successful events / total events across all tools.
    /// Zero events yields 0.0.
    pub fn completion_rate(&self, user_id: &str) -> f64 {
        let total = self.len(user_id);
        if total == 0 {
            return 0.0;
        }
        let successes = self.events(user_id).filter(|e| e.success).count();
        successes as f64 / total as f64
    }
}
