// kiln-market/src/store/favorites.rs

use std::collections::HashMap;

/// Per-buyer favorite product ids, kept in the order they were added.
#[derive(Debug, Default)]
pub struct FavoriteBook {
  by_buyer: HashMap<String, Vec<String>>,
}

impl FavoriteBook {
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts a buyer with an initial favorite set, duplicates dropped.
  pub fn seed(&mut self, buyer_id: &str, product_ids: &[String]) {
    let set = self.by_buyer.entry(buyer_id.to_string()).or_default();
    for id in product_ids {
      if !set.contains(id) {
        set.push(id.clone());
      }
    }
  }

  /// Flips membership and returns whether the product is now a favorite.
  pub fn toggle(&mut self, buyer_id: &str, product_id: &str) -> bool {
    let set = self.by_buyer.entry(buyer_id.to_string()).or_default();
    match set.iter().position(|id| id == product_id) {
      Some(idx) => {
        set.remove(idx);
        false
      }
      None => {
        set.push(product_id.to_string());
        true
      }
    }
  }

  pub fn is_favorite(&self, buyer_id: &str, product_id: &str) -> bool {
    self
      .by_buyer
      .get(buyer_id)
      .map_or(false, |set| set.iter().any(|id| id == product_id))
  }

  pub fn ids(&self, buyer_id: &str) -> Vec<String> {
    self.by_buyer.get(buyer_id).cloned().unwrap_or_default()
  }

  pub fn count(&self, buyer_id: &str) -> usize {
    self.by_buyer.get(buyer_id).map_or(0, Vec::len)
  }

  pub fn purge_product(&mut self, product_id: &str) -> usize {
    let mut removed = 0;
    for set in self.by_buyer.values_mut() {
      let before = set.len();
      set.retain(|id| id != product_id);
      removed += before - set.len();
    }
    removed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toggle_adds_then_removes() {
    let mut book = FavoriteBook::new();
    book.seed("buyer1", &["p1".to_string(), "p8".to_string(), "p1".to_string()]);
    assert_eq!(book.count("buyer1"), 2);

    assert!(book.toggle("buyer1", "p3"));
    assert!(book.is_favorite("buyer1", "p3"));
    assert!(!book.toggle("buyer1", "p1"));
    assert_eq!(book.ids("buyer1"), vec!["p8", "p3"]);
    assert!(!book.is_favorite("buyer2", "p8"));
  }

  #[test]
  fn purge_drops_the_product_for_everyone() {
    let mut book = FavoriteBook::new();
    book.seed("buyer1", &["p1".to_string(), "p8".to_string()]);
    book.seed("buyer2", &["p8".to_string()]);
    assert_eq!(book.purge_product("p8"), 2);
    assert_eq!(book.count("buyer2"), 0);
    assert_eq!(book.ids("buyer1"), vec!["p1"]);
  }
}
