// kiln-market/src/store/messages.rs

use crate::models::Message;

/// Append-only message log. Only the `read` flag changes after a message is stored.
#[derive(Debug, Default)]
pub struct MessageLog {
  messages: Vec<Message>,
}

impl MessageLog {
  pub fn new(messages: Vec<Message>) -> Self {
    Self { messages }
  }

  pub fn append(&mut self, message: Message) {
    self.messages.push(message);
  }

  /// Thread between `party` and `counterpart`, oldest first.
  pub fn conversation(&self, party: &str, counterpart: &str) -> Vec<Message> {
    let mut thread: Vec<Message> = self
      .messages
      .iter()
      .filter(|m| m.is_between(party, counterpart))
      .cloned()
      .collect();
    thread.sort_by_key(|m| m.timestamp);
    thread
  }

  /// Every message `party` appears in, oldest first.
  pub fn involving(&self, party: &str) -> Vec<Message> {
    let mut all: Vec<Message> = self.messages.iter().filter(|m| m.involves(party)).cloned().collect();
    all.sort_by_key(|m| m.timestamp);
    all
  }

  /// Unread messages stored under `buyer_id`.
  pub fn unread_count(&self, buyer_id: &str) -> usize {
    self.messages.iter().filter(|m| m.buyer_id == buyer_id && !m.read).count()
  }

  /// Marks the whole thread read; returns how many messages flipped.
  pub fn mark_conversation_read(&mut self, party: &str, counterpart: &str) -> usize {
    let mut flipped = 0;
    for message in self.messages.iter_mut().filter(|m| m.is_between(party, counterpart) && !m.read) {
      message.read = true;
      flipped += 1;
    }
    flipped
  }
}
