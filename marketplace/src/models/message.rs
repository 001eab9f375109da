// kiln-market/src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub id: String,
  pub buyer_id: String,
  pub seller_id: String,
  pub content: String,
  pub timestamp: DateTime<Utc>,
  pub read: bool,
}

impl Message {
  pub fn new(buyer_id: &str, seller_id: &str, content: &str) -> Self {
    Self {
      id: format!("msg-{}", Uuid::new_v4()),
      buyer_id: buyer_id.to_string(),
      seller_id: seller_id.to_string(),
      content: content.to_string(),
      timestamp: Utc::now(),
      read: false,
    }
  }

  /// True when the message belongs to the thread between `party` and `counterpart`,
  /// whichever side of the buyer/seller pair each of them is stored on.
  pub fn is_between(&self, party: &str, counterpart: &str) -> bool {
    (self.buyer_id == party && self.seller_id == counterpart)
      || (self.seller_id == party && self.buyer_id == counterpart)
  }

  pub fn involves(&self, party: &str) -> bool {
    self.buyer_id == party || self.seller_id == party
  }
}
