//! Shared message log primitives for the CLI and future UIs.
use std::collections::VecDeque;

use game_core::BlockHeight;
use runtime::{StatusLevel, StatusMessage};

/// Severity level for UI messages produced from runtime events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Success,
    Error,
}

impl From<StatusLevel> for MessageLevel {
    fn from(level: StatusLevel) -> Self {
        match level {
            StatusLevel::Info => MessageLevel::Info,
            StatusLevel::Success => MessageLevel::Success,
            StatusLevel::Error => MessageLevel::Error,
        }
    }
}

/// Snapshot of a single message entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEntry {
    pub text: String,
    /// Last block height known when the line arrived.
    pub block_height: Option<BlockHeight>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(
        text: impl Into<String>,
        block_height: Option<BlockHeight>,
        level: MessageLevel,
    ) -> Self {
        Self {
            text: text.into(),
            block_height,
            level,
        }
    }

    pub fn from_status(message: &StatusMessage, block_height: Option<BlockHeight>) -> Self {
        Self::new(message.text.clone(), block_height, message.level.into())
    }
}

/// Circular buffer of status lines shown to the player.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn push_text(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Info));
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_error(&self) -> Option<&MessageEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.level == MessageLevel::Error)
    }
}
