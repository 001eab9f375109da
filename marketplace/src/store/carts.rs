// kiln-market/src/store/carts.rs

use crate::models::{Cart, LineChange};
use std::collections::HashMap;

/// A cart line that changed because its product's stock moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledLine {
  pub buyer_id: String,
  pub product_id: String,
  pub change: LineChange,
}

/// One cart per buyer, created on first use.
#[derive(Debug, Default)]
pub struct CartBook {
  carts: HashMap<String, Cart>,
}

impl CartBook {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cart_mut(&mut self, buyer_id: &str) -> &mut Cart {
    self
      .carts
      .entry(buyer_id.to_string())
      .or_insert_with(|| Cart::new(buyer_id))
  }

  /// Copy of the buyer's cart; an empty one when the buyer never used it.
  pub fn snapshot(&self, buyer_id: &str) -> Cart {
    self.carts.get(buyer_id).cloned().unwrap_or_else(|| Cart::new(buyer_id))
  }

  /// Clamps every line of `product_id` to `inventory`, dropping lines that hit zero.
  pub fn reconcile_product(&mut self, product_id: &str, inventory: u32) -> Vec<ReconciledLine> {
    let mut changed = Vec::new();
    for cart in self.carts.values_mut() {
      let change = cart.reconcile(product_id, inventory);
      if change != LineChange::Unchanged {
        changed.push(ReconciledLine {
          buyer_id: cart.buyer_id.clone(),
          product_id: product_id.to_string(),
          change,
        });
      }
    }
    changed
  }

  /// Removes `product_id` from every cart; returns how many lines went away.
  pub fn purge_product(&mut self, product_id: &str) -> usize {
    self
      .carts
      .values_mut()
      .filter_map(|cart| cart.remove(product_id))
      .count()
  }
}
