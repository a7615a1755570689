//! Query log - append-only record of processed queries
//!
//! Lives for the lifetime of the process. Unbounded unless a capacity is
//! configured, in which case the oldest entries are evicted; ids keep
//! increasing and [`QueryLog::len`] still counts every query ever recorded.

use crate::types::QueryId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A recorded user query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Unique, strictly increasing identifier
    pub id: QueryId,
    /// Raw query text
    pub text: String,
    /// When the query was recorded
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LogState {
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
    entries: VecDeque<Query>,
}

impl LogState {
    /// Wall-clock time, clamped so it never precedes the previous stamp
    fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let timestamp = self.last_timestamp.map_or(now, |last| last.max(now));
        self.last_timestamp = Some(timestamp);
        timestamp
    }
}

/// Thread-safe in-memory query log
#[derive(Debug, Default)]
pub struct QueryLog {
    state: Mutex<LogState>,
    capacity: Option<usize>,
}

impl QueryLog {
    /// Create an unbounded log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that retains at most `capacity` entries (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Append a query and return the stored record
    pub fn record(&self, text: impl Into<String>) -> Query {
        let mut state = self.state.lock();
        state.next_seq += 1;
        // Stamped under the lock so timestamps follow id order.
        let timestamp = state.stamp(Utc::now());
        let query = Query {
            id: QueryId::new(state.next_seq),
            text: text.into(),
            timestamp,
        };
        state.entries.push_back(query.clone());

        if let Some(capacity) = self.capacity {
            while state.entries.len() > capacity {
                state.entries.pop_front();
            }
        }

        query
    }

    /// The most recent `limit` queries, oldest first
    pub fn history(&self, limit: usize) -> Vec<Query> {
        let state = self.state.lock();
        let skip = state.entries.len().saturating_sub(limit);
        state.entries.iter().skip(skip).cloned().collect()
    }

    /// Total number of queries ever recorded
    pub fn len(&self) -> usize {
        self.state.lock().next_seq as usize
    }

    /// Whether no query has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
