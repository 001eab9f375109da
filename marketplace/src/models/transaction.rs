// kiln-market/src/models/transaction.rs

use crate::models::cart::CartItem;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
  Pending,
  Completed,
  Cancelled,
}

/// One seller's share of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
  pub id: String,
  pub order_id: Uuid,
  pub buyer_id: String,
  pub seller_id: String,
  pub items: Vec<CartItem>,
  pub total: Decimal,
  pub timestamp: DateTime<Utc>,
  pub status: TransactionStatus,
}

impl Transaction {
  /// Splits cart lines into one completed transaction per seller, in order of
  /// each seller's first line.
  pub fn split_by_seller(order_id: Uuid, buyer_id: &str, items: &[CartItem]) -> Vec<Transaction> {
    let now = Utc::now();
    let mut transactions: Vec<Transaction> = Vec::new();
    for item in items {
      match transactions.iter_mut().find(|t| t.seller_id == item.seller_id) {
        Some(existing) => {
          existing.total = existing.total.saturating_add(item.line_total());
          existing.items.push(item.clone());
        }
        None => transactions.push(Transaction {
          id: format!("txn-{}", Uuid::new_v4()),
          order_id,
          buyer_id: buyer_id.to_string(),
          seller_id: item.seller_id.clone(),
          items: vec![item.clone()],
          total: item.line_total(),
          timestamp: now,
          status: TransactionStatus::Completed,
        }),
      }
    }
    transactions
  }
}
