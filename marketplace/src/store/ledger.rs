// kiln-market/src/store/ledger.rs

use crate::models::Transaction;

/// Completed transactions, in the order they were recorded.
#[derive(Debug, Default)]
pub struct Ledger {
  transactions: Vec<Transaction>,
}

impl Ledger {
  pub fn new(transactions: Vec<Transaction>) -> Self {
    Self { transactions }
  }

  pub fn record(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
    self.transactions.extend(transactions);
  }

  pub fn for_buyer(&self, buyer_id: &str) -> Vec<Transaction> {
    self.transactions.iter().filter(|t| t.buyer_id == buyer_id).cloned().collect()
  }

  pub fn for_seller(&self, seller_id: &str) -> Vec<Transaction> {
    self.transactions.iter().filter(|t| t.seller_id == seller_id).cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.transactions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.transactions.is_empty()
  }
}
