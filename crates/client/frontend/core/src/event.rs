//! Utilities for reacting to runtime events inside UI layers.
use game_core::BlockHeight;
use runtime::{Event, SessionEvent, SnapshotEvent};

use crate::config::MessageConfig;
use crate::message::{MessageEntry, MessageLog};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventImpact {
    pub requires_redraw: bool,
}

impl EventImpact {
    pub const fn none() -> Self {
        Self {
            requires_redraw: false,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            requires_redraw: self.requires_redraw || other.requires_redraw,
        }
    }
}

pub trait EventConsumer {
    fn on_event(&mut self, event: &Event) -> EventImpact;
    fn message_log(&self) -> &MessageLog;
    fn message_log_mut(&mut self) -> &mut MessageLog;
    fn take_message_log(self) -> MessageLog
    where
        Self: Sized;
}

/// Feeds status lines into a [`MessageLog`] and tracks the chain height so
/// entries can be stamped with it.
#[derive(Clone, Debug)]
pub struct StatusLogConsumer {
    messages: MessageLog,
    show_refresh: bool,
    block_height: Option<BlockHeight>,
}

impl StatusLogConsumer {
    pub fn new(config: &MessageConfig) -> Self {
        Self {
            messages: MessageLog::new(config.capacity),
            show_refresh: config.show_refresh,
            block_height: None,
        }
    }

    pub fn block_height(&self) -> Option<BlockHeight> {
        self.block_height
    }
}

impl EventConsumer for StatusLogConsumer {
    fn on_event(&mut self, event: &Event) -> EventImpact {
        match event {
            Event::Status(message) => {
                if message.is_refresh_notice() && !self.show_refresh {
                    tracing::trace!("Refresh notice hidden");
                    return EventImpact::none();
                }
                self.messages
                    .push(MessageEntry::from_status(message, self.block_height));
                EventImpact::redraw()
            }
            Event::Snapshot(SnapshotEvent::Refreshed { block_height, .. }) => {
                self.block_height = Some(*block_height);
                EventImpact::redraw()
            }
            Event::Snapshot(SnapshotEvent::Cleared) => {
                tracing::debug!("Snapshot cleared, dropping block height");
                self.block_height = None;
                EventImpact::redraw()
            }
            Event::Session(SessionEvent::Connected { .. })
            | Event::Session(SessionEvent::Disconnected { .. }) => EventImpact::redraw(),
        }
    }

    fn message_log(&self) -> &MessageLog {
        &self.messages
    }

    fn message_log_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    fn take_message_log(self) -> MessageLog {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use game_core::{Address, RoundId};
    use runtime::{DisconnectReason, StatusMessage};

    use super::*;
    use crate::message::MessageLevel;

    #[test]
    fn status_lines_are_stamped_with_the_last_height() {
        let mut consumer = StatusLogConsumer::new(&MessageConfig::default());

        let impact = consumer.on_event(&Event::Snapshot(SnapshotEvent::Refreshed {
            round_id: RoundId(2),
            block_height: 420,
            round_end_crossed: false,
        }));
        assert!(impact.requires_redraw);

        consumer.on_event(&Event::Status(StatusMessage::error("Error refreshing game state: x")));
        let entry = consumer.message_log().recent(1).next().unwrap();
        assert_eq!(entry.block_height, Some(420));
        assert_eq!(entry.level, MessageLevel::Error);

        consumer.on_event(&Event::Session(SessionEvent::Disconnected {
            address: Address::new("shareledger1player"),
            reason: DisconnectReason::KeystoreChanged,
        }));
        consumer.on_event(&Event::Snapshot(SnapshotEvent::Cleared));
        assert_eq!(consumer.block_height(), None);
    }

    #[test]
    fn refresh_notices_are_hidden_unless_enabled() {
        let notice = Event::Status(StatusMessage::info(StatusMessage::REFRESHED));

        let mut quiet = StatusLogConsumer::new(&MessageConfig::default());
        assert_eq!(quiet.on_event(&notice), EventImpact::none());
        assert!(quiet.message_log().is_empty());

        let mut chatty = StatusLogConsumer::new(&MessageConfig {
            show_refresh: true,
            ..MessageConfig::default()
        });
        chatty.on_event(&notice);
        assert_eq!(chatty.take_message_log().len(), 1);
    }
}
