//! Bounded chat session state.
//!
//! The presentation layer owns chat history explicitly: a capped log of
//! exchanges, oldest evicted first. Nothing here persists; dropping the
//! log drops the session.

use std::collections::VecDeque;

use serde::Serialize;

/// Default cap on retained exchanges.
pub const DEFAULT_CHAT_CAPACITY: usize = 50;

/// One query/reply pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub ts: String,
    pub query: String,
    pub reply: String,
}

/// A capped, in-memory chat history.
#[derive(Debug)]
pub struct ChatLog {
    capacity: usize,
    entries: VecDeque<Exchange>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_CAPACITY)
    }
}

impl ChatLog {
    /// `capacity` of 0 is clamped to 1; a log that can hold nothing is
    /// not a log.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Record an exchange, evicting the oldest entry when full.
    pub fn push(&mut self, query: impl Into<String>, reply: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Exchange {
            ts: cadence_core::now_rfc3339(),
            query: query.into(),
            reply: reply.into(),
        });
    }

    /// Exchanges oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Exchange> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
