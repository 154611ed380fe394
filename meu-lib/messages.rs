//! User-visible messages published by commands.
//!
//! Commands report invalid input as errors and no-op conditions as info
//! messages. Hosts either read the active message or poll the event log with
//! [`MessageCenter::events_since`], passing the last `seq` they saw.

use std::collections::VecDeque;

use serde::{
  Deserialize,
  Serialize,
};

pub const DEFAULT_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub id:     u64,
  pub level:  MessageLevel,
  /// The command that published the message.
  pub source: Option<String>,
  pub text:   String,
}

/// A published message, numbered for polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
  pub seq:     u64,
  pub message: Message,
}

/// Keeps the active message and the last `limit` published ones.
#[derive(Debug, Clone)]
pub struct MessageCenter {
  active:  Option<Message>,
  events:  VecDeque<MessageEvent>,
  next_id: u64,
  limit:   usize,
}

impl Default for MessageCenter {
  fn default() -> Self {
    Self::with_limit(DEFAULT_LIMIT)
  }
}

impl MessageCenter {
  pub fn with_limit(limit: usize) -> Self {
    Self {
      active:  None,
      events:  VecDeque::new(),
      next_id: 1,
      limit:   limit.max(1),
    }
  }

  pub fn active(&self) -> Option<&Message> {
    self.active.as_ref()
  }

  /// Most recently published message, active or not.
  pub fn last(&self) -> Option<&Message> {
    self.events.back().map(|event| &event.message)
  }

  /// The `seq` of the last published message, `0` before the first one.
  pub fn latest_seq(&self) -> u64 {
    self.next_id - 1
  }

  pub fn events_since(&self, seq: u64) -> Vec<MessageEvent> {
    self
      .events
      .iter()
      .filter(|event| event.seq > seq)
      .cloned()
      .collect()
  }

  pub fn publish(&mut self, level: MessageLevel, source: Option<String>, text: impl Into<String>) -> Message {
    let message = Message {
      id: self.next_id,
      level,
      source,
      text: text.into(),
    };
    self.next_id += 1;

    // Info never displaces an active warning or error.
    let outranked = level == MessageLevel::Info && self.active.as_ref().is_some_and(|active| active.level > level);
    if !outranked {
      self.active = Some(message.clone());
    }

    self.events.push_back(MessageEvent {
      seq:     message.id,
      message: message.clone(),
    });
    if self.events.len() > self.limit {
      self.events.pop_front();
    }
    message
  }

  pub fn info(&mut self, source: Option<String>, text: impl Into<String>) -> Message {
    self.publish(MessageLevel::Info, source, text)
  }

  pub fn error(&mut self, source: Option<String>, text: impl Into<String>) -> Message {
    self.publish(MessageLevel::Error, source, text)
  }

  pub fn dismiss_active(&mut self) -> Option<Message> {
    self.active.take()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_publish_sets_active() {
    let mut center = MessageCenter::default();
    assert_eq!(center.latest_seq(), 0);
    let message = center.error(Some("jump_to".into()), "boom");
    assert_eq!(center.active(), Some(&message));
    assert_eq!(center.last(), Some(&message));

    let events = center.events_since(0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].seq, 1);
    assert_eq!(center.latest_seq(), 1);
    assert!(center.events_since(1).is_empty());
  }

  #[test]
  fn test_log_is_bounded() {
    let mut center = MessageCenter::with_limit(2);
    center.info(None, "a");
    center.info(None, "b");
    center.info(None, "c");

    let seqs: Vec<u64> = center.events_since(0).iter().map(|event| event.seq).collect();
    assert_eq!(seqs, [2, 3]);
    assert_eq!(center.last().unwrap().text, "c");
  }

  #[test]
  fn test_info_does_not_displace_error() {
    let mut center = MessageCenter::default();
    let error = center.error(Some("selection_fields".into()), "bad mode");
    center.info(Some("split_selection".into()), "Cannot split an empty selection.");
    assert_eq!(center.active().unwrap().id, error.id);
    assert_eq!(center.last().unwrap().text, "Cannot split an empty selection.");

    center.publish(MessageLevel::Warning, None, "careful");
    center.info(None, "still outranked");
    assert_eq!(center.active().unwrap().level, MessageLevel::Warning);
  }

  #[test]
  fn test_error_replaces_info() {
    let mut center = MessageCenter::default();
    center.info(None, "nothing selected");
    center.error(None, "bad expression");
    assert_eq!(center.active().unwrap().text, "bad expression");
  }

  #[test]
  fn test_dismiss_then_info_becomes_active() {
    let mut center = MessageCenter::default();
    center.error(None, "bad expression");
    assert_eq!(center.dismiss_active().unwrap().text, "bad expression");
    center.info(None, "nothing selected");
    assert_eq!(center.active().unwrap().level, MessageLevel::Info);
  }

  #[test]
  fn test_events_serialize() {
    let mut center = MessageCenter::default();
    center.publish(MessageLevel::Warning, Some("jump_to".into()), "no match");
    let json = serde_json::to_value(&center.events_since(0)[0]).unwrap();
    assert_eq!(json["seq"], 1);
    assert_eq!(json["message"]["level"], "warning");
    assert_eq!(json["message"]["source"], "jump_to");
  }
}
