// kiln-market/src/store/seed.rs

use crate::errors::{AppError, Result};
use crate::models::{Buyer, Message, Product, Seller, Transaction};
use serde::Deserialize;

const BUNDLED_CATALOG: &str = include_str!("../../data/demo_catalog.json");

/// Initial contents of every store.
#[derive(Debug, Default, Deserialize)]
pub struct DemoData {
  #[serde(default)]
  pub sellers: Vec<Seller>,
  #[serde(default)]
  pub buyers: Vec<Buyer>,
  #[serde(default)]
  pub products: Vec<Product>,
  #[serde(default)]
  pub messages: Vec<Message>,
  #[serde(default)]
  pub transactions: Vec<Transaction>,
}

impl DemoData {
  /// The demo catalog compiled into the binary.
  pub fn bundled() -> Result<Self> {
    Self::from_json(BUNDLED_CATALOG)
  }

  pub fn from_json(raw: &str) -> Result<Self> {
    let data: DemoData =
      serde_json::from_str(raw).map_err(|e| AppError::Config(format!("Demo catalog is malformed: {}", e)))?;
    data.check_references()?;
    Ok(data)
  }

  fn check_references(&self) -> Result<()> {
    for product in &self.products {
      if !self.sellers.iter().any(|s| s.id == product.seller_id) {
        return Err(AppError::Config(format!(
          "Product '{}' references unknown seller '{}'",
          product.id, product.seller_id
        )));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_catalog_loads() {
    let data = DemoData::bundled().unwrap();
    assert_eq!(data.sellers.len(), 3);
    assert_eq!(data.buyers.len(), 2);
    assert_eq!(data.products.len(), 13);
    assert_eq!(data.messages.len(), 2);
    assert_eq!(data.transactions.len(), 1);
    assert!(data.products.iter().all(|p| p.active));
    assert_eq!(data.buyers[0].favorites, vec!["p1", "p8"]);
  }

  #[test]
  fn dangling_seller_reference_is_rejected() {
    let raw = r#"{"products":[{"id":"p1","sellerId":"ghost","title":"Mug","description":"A mug for tea.","price":10,
      "images":[],"category":"Kitchen","tags":["mug"],"featured":false,"inventory":1}]}"#;
    assert!(matches!(DemoData::from_json(raw), Err(AppError::Config(_))));
  }
}
