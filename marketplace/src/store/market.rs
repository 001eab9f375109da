// kiln-market/src/store/market.rs

//! `Marketplace`: every store behind its own lock, plus the operations that
//! have to touch several of them at once.
//!
//! Locks are always taken in the order catalog, carts, favorites, messages,
//! ledger, so a stock change and a cart mutation can never interleave. No
//! method here awaits, so no guard outlives the call.

use crate::errors::{AppError, Result};
use crate::models::{Buyer, Cart, CartItem, CartView, Message, Product, ProductDraft, QuantityOutcome, Transaction};
use crate::store::carts::{CartBook, ReconciledLine};
use crate::store::catalog::{Catalog, SellerDashboard};
use crate::store::favorites::FavoriteBook;
use crate::store::ledger::Ledger;
use crate::store::messages::MessageLog;
use crate::store::seed::DemoData;
use crate::store::session::Session;
use parking_lot::{RwLock, RwLockReadGuard};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a cart quantity operation.
#[derive(Debug, Clone)]
pub struct CartMutation {
  pub product: Product,
  pub outcome: QuantityOutcome,
  pub cart: CartView,
}

/// A product edit together with the cart lines it forced to change.
#[derive(Debug, Clone)]
pub struct ProductChange {
  pub product: Product,
  pub reconciled: Vec<ReconciledLine>,
}

#[derive(Debug, Clone)]
pub struct ProductRemoval {
  pub product: Product,
  pub cart_lines_removed: usize,
  pub favorites_removed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbox {
  pub messages: Vec<Message>,
  pub unread_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
  pub order_id: Uuid,
  pub total: Decimal,
  pub transactions: Vec<Transaction>,
  /// Lines in other buyers' carts that shrank because this order used up stock.
  #[serde(skip)]
  pub reconciled: Vec<ReconciledLine>,
}

#[derive(Debug)]
pub struct Marketplace {
  catalog: RwLock<Catalog>,
  carts: RwLock<CartBook>,
  favorites: RwLock<FavoriteBook>,
  messages: RwLock<MessageLog>,
  ledger: RwLock<Ledger>,
  session: Session,
}

impl Marketplace {
  pub fn from_data(data: DemoData, session_file: Option<PathBuf>) -> Self {
    let mut favorites = FavoriteBook::new();
    for buyer in &data.buyers {
      favorites.seed(&buyer.id, &buyer.favorites);
    }
    let buyer_ids: Vec<String> = data.buyers.iter().map(|b| b.id.clone()).collect();
    info!(
      sellers = data.sellers.len(),
      buyers = data.buyers.len(),
      products = data.products.len(),
      "Marketplace stores initialised."
    );

    Self {
      catalog: RwLock::new(Catalog::new(data.sellers, data.buyers, data.products)),
      carts: RwLock::new(CartBook::new()),
      favorites: RwLock::new(favorites),
      messages: RwLock::new(MessageLog::new(data.messages)),
      ledger: RwLock::new(Ledger::new(data.transactions)),
      session: Session::restore(session_file, &buyer_ids),
    }
  }

  /// Read access to products, sellers and buyers.
  pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
    self.catalog.read()
  }

  fn buyer_in(catalog: &Catalog, buyer_id: &str) -> Result<Buyer> {
    catalog
      .buyer(buyer_id)
      .cloned()
      .ok_or_else(|| AppError::NotFound(format!("Buyer '{}' not found", buyer_id)))
  }

  pub fn buyer(&self, buyer_id: &str) -> Result<Buyer> {
    Self::buyer_in(&self.catalog.read(), buyer_id)
  }

  // --- Session ---

  pub fn current_buyer(&self) -> Option<String> {
    self.session.current()
  }

  pub fn switch_buyer(&self, buyer_id: &str) -> Result<Buyer> {
    let buyer = self.buyer(buyer_id)?;
    self.session.switch(&buyer.id);
    info!(buyer_id = %buyer.id, "Current buyer switched.");
    Ok(buyer)
  }

  // --- Cart ---

  pub fn cart(&self, buyer_id: &str) -> Result<CartView> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    Ok(self.carts.write().cart_mut(buyer_id).view())
  }

  pub fn add_to_cart(&self, buyer_id: &str, product_id: &str, quantity: u32) -> Result<CartMutation> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let product = catalog.purchasable(product_id)?.clone();

    let mut carts = self.carts.write();
    let cart = carts.cart_mut(buyer_id);
    let outcome = cart.add(&product, quantity);
    debug!(buyer_id, product_id, quantity, change = ?outcome.change, "Cart add applied.");
    Ok(CartMutation {
      product,
      outcome,
      cart: cart.view(),
    })
  }

  pub fn set_cart_quantity(&self, buyer_id: &str, product_id: &str, quantity: i64) -> Result<CartMutation> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let product = catalog
      .product(product_id)
      .cloned()
      .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", product_id)))?;

    let mut carts = self.carts.write();
    let cart = carts.cart_mut(buyer_id);
    let outcome = cart.set_quantity(product_id, quantity, product.inventory);
    debug!(buyer_id, product_id, quantity, change = ?outcome.change, "Cart quantity applied.");
    Ok(CartMutation {
      product,
      outcome,
      cart: cart.view(),
    })
  }

  pub fn remove_from_cart(&self, buyer_id: &str, product_id: &str) -> Result<(Option<CartItem>, CartView)> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let mut carts = self.carts.write();
    let cart = carts.cart_mut(buyer_id);
    let removed = cart.remove(product_id);
    Ok((removed, cart.view()))
  }

  pub fn clear_cart(&self, buyer_id: &str) -> Result<CartView> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let mut carts = self.carts.write();
    let cart = carts.cart_mut(buyer_id);
    cart.clear();
    Ok(cart.view())
  }

  // --- Favorites ---

  pub fn toggle_favorite(&self, buyer_id: &str, product_id: &str) -> Result<bool> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    if catalog.product(product_id).is_none() {
      return Err(AppError::NotFound(format!("Product '{}' not found", product_id)));
    }
    Ok(self.favorites.write().toggle(buyer_id, product_id))
  }

  pub fn is_favorite(&self, buyer_id: &str, product_id: &str) -> bool {
    self.favorites.read().is_favorite(buyer_id, product_id)
  }

  /// Favorite products in catalog order.
  pub fn favorite_products(&self, buyer_id: &str) -> Result<Vec<Product>> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let favorites = self.favorites.read();
    Ok(
      catalog
        .products()
        .iter()
        .filter(|p| favorites.is_favorite(buyer_id, &p.id))
        .cloned()
        .collect(),
    )
  }

  pub fn favorites_count(&self, buyer_id: &str) -> usize {
    self.favorites.read().count(buyer_id)
  }

  // --- Messages ---

  fn require_seller(catalog: &Catalog, seller_id: &str) -> Result<()> {
    catalog
      .seller(seller_id)
      .map(|_| ())
      .ok_or_else(|| AppError::NotFound(format!("Seller '{}' not found", seller_id)))
  }

  pub fn send_message(&self, buyer_id: &str, seller_id: &str, content: &str) -> Result<Message> {
    let content = content.trim();
    if content.is_empty() {
      return Err(AppError::Validation("Message content cannot be empty.".to_string()));
    }
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    Self::require_seller(&catalog, seller_id)?;

    let message = Message::new(buyer_id, seller_id, content);
    self.messages.write().append(message.clone());
    Ok(message)
  }

  pub fn conversation(&self, buyer_id: &str, seller_id: &str) -> Result<Vec<Message>> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    Self::require_seller(&catalog, seller_id)?;
    Ok(self.messages.read().conversation(buyer_id, seller_id))
  }

  pub fn inbox(&self, buyer_id: &str) -> Result<Inbox> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let messages = self.messages.read();
    Ok(Inbox {
      messages: messages.involving(buyer_id),
      unread_count: messages.unread_count(buyer_id),
    })
  }

  pub fn mark_conversation_read(&self, buyer_id: &str, seller_id: &str) -> Result<usize> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    Self::require_seller(&catalog, seller_id)?;
    Ok(self.messages.write().mark_conversation_read(buyer_id, seller_id))
  }

  // --- Seller dashboard ---

  pub fn dashboard(&self, seller_id: &str) -> Result<SellerDashboard> {
    self.catalog.read().dashboard(seller_id)
  }

  pub fn create_product(&self, seller_id: &str, draft: ProductDraft) -> Result<Product> {
    let product = self.catalog.write().create_product(seller_id, draft)?;
    info!(seller_id, product_id = %product.id, "Product created.");
    Ok(product)
  }

  /// Saves an edit and brings every cart under the product's new inventory.
  pub fn update_product(&self, seller_id: &str, product_id: &str, draft: ProductDraft) -> Result<ProductChange> {
    let mut catalog = self.catalog.write();
    let (before, after) = catalog.update_product(seller_id, product_id, draft)?;
    let reconciled = if after.inventory < before.inventory {
      self.carts.write().reconcile_product(product_id, after.inventory)
    } else {
      Vec::new()
    };
    info!(seller_id, product_id, reconciled_lines = reconciled.len(), "Product updated.");
    Ok(ProductChange {
      product: after,
      reconciled,
    })
  }

  pub fn delete_product(&self, seller_id: &str, product_id: &str) -> Result<ProductRemoval> {
    let mut catalog = self.catalog.write();
    let product = catalog.delete_product(seller_id, product_id)?;
    let cart_lines_removed = self.carts.write().purge_product(product_id);
    let favorites_removed = self.favorites.write().purge_product(product_id);
    info!(seller_id, product_id, cart_lines_removed, favorites_removed, "Product deleted.");
    Ok(ProductRemoval {
      product,
      cart_lines_removed,
      favorites_removed,
    })
  }

  pub fn duplicate_product(&self, seller_id: &str, product_id: &str) -> Result<Product> {
    let copy = self.catalog.write().duplicate_product(seller_id, product_id)?;
    info!(seller_id, source_id = product_id, product_id = %copy.id, "Product duplicated.");
    Ok(copy)
  }

  /// Enables or disables a product; disabling takes it out of every cart.
  pub fn toggle_product_status(&self, seller_id: &str, product_id: &str) -> Result<ProductChange> {
    let mut catalog = self.catalog.write();
    let product = catalog.toggle_active(seller_id, product_id)?;
    let reconciled = if product.active {
      Vec::new()
    } else {
      self.carts.write().reconcile_product(product_id, 0)
    };
    info!(seller_id, product_id, active = product.active, "Product status toggled.");
    Ok(ProductChange { product, reconciled })
  }

  // --- Checkout ---

  /// The cart to be paid for. An empty cart cannot be checked out.
  pub fn checkout_cart(&self, buyer_id: &str) -> Result<Cart> {
    let catalog = self.catalog.read();
    Self::buyer_in(&catalog, buyer_id)?;
    let cart = self.carts.read().snapshot(buyer_id);
    if cart.is_empty() {
      return Err(AppError::Validation(
        "Your cart is empty. Add some items before checking out.".to_string(),
      ));
    }
    Ok(cart)
  }

  /// Books a paid order: one transaction per seller, stock taken out of the
  /// catalog, other carts reconciled and the booked lines taken out of the
  /// buyer's cart.
  ///
  /// Stock is checked for every line, and `items` must still be exactly what the
  /// buyer's cart holds, before anything changes. The order is either booked
  /// completely or not at all.
  pub fn complete_order(&self, buyer_id: &str, order_id: Uuid, items: &[CartItem]) -> Result<PlacedOrder> {
    let mut catalog = self.catalog.write();
    for item in items {
      let product = catalog.purchasable(&item.product_id)?;
      if item.quantity > product.inventory {
        return Err(AppError::Validation(format!(
          "Sorry, only {} units of '{}' available.",
          product.inventory, product.title
        )));
      }
    }

    let mut carts = self.carts.write();
    let cart = carts.cart_mut(buyer_id);
    if !Self::cart_matches(cart, items) {
      warn!(buyer_id, %order_id, "Cart changed while the order was being paid; booking refused.");
      return Err(AppError::Validation(
        "Your cart changed during checkout. Please review it and try again.".to_string(),
      ));
    }
    for item in items {
      cart.remove(&item.product_id);
    }

    let mut reconciled = Vec::new();
    for item in items {
      let remaining = catalog.decrement_inventory(&item.product_id, item.quantity)?;
      reconciled.extend(carts.reconcile_product(&item.product_id, remaining));
    }

    let transactions = Transaction::split_by_seller(order_id, buyer_id, items);
    let total = transactions.iter().map(|t| t.total).fold(Decimal::ZERO, Decimal::saturating_add);
    self.ledger.write().record(transactions.iter().cloned());

    info!(
      buyer_id,
      %order_id,
      %total,
      sellers = transactions.len(),
      reconciled_lines = reconciled.len(),
      "Order booked."
    );
    Ok(PlacedOrder {
      order_id,
      total,
      transactions,
      reconciled,
    })
  }

  /// The paid lines are exactly what the cart holds now: same products, quantities and prices.
  fn cart_matches(cart: &Cart, items: &[CartItem]) -> bool {
    cart.items.len() == items.len()
      && items.iter().all(|paid| {
        cart
          .line(&paid.product_id)
          .map_or(false, |line| line.quantity == paid.quantity && line.price == paid.price)
      })
  }

  pub fn transactions_for_buyer(&self, buyer_id: &str) -> Vec<Transaction> {
    self.ledger.read().for_buyer(buyer_id)
  }

  pub fn transactions_for_seller(&self, seller_id: &str) -> Vec<Transaction> {
    self.ledger.read().for_seller(seller_id)
  }
}

impl Default for Marketplace {
  fn default() -> Self {
    Self::from_data(DemoData::default(), None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::LineChange;

  fn market() -> Marketplace {
    Marketplace::from_data(DemoData::bundled().unwrap(), None)
  }

  fn draft_from(product: &Product, inventory: i64) -> ProductDraft {
    ProductDraft {
      title: product.title.clone(),
      description: product.description.clone(),
      price: product.price,
      category: product.category.clone(),
      tags: product.tags.clone(),
      images: product.images.clone(),
      inventory,
      featured: product.featured,
    }
  }

  fn assert_carts_within_stock(market: &Marketplace) {
    let catalog = market.catalog();
    for buyer in catalog.buyers() {
      for line in market.carts.read().snapshot(&buyer.id).items {
        let product = catalog.product(&line.product_id).expect("line for a deleted product");
        assert!(line.quantity >= 1 && line.quantity <= product.inventory);
      }
    }
  }

  #[test]
  fn seller_stock_cut_clamps_every_cart() {
    let market = market();
    market.add_to_cart("buyer1", "p1", 10).unwrap();
    market.add_to_cart("buyer2", "p1", 3).unwrap();

    let p1 = market.catalog().product("p1").cloned().unwrap();
    let change = market.update_product("seller1", "p1", draft_from(&p1, 4)).unwrap();
    assert_eq!(change.reconciled.len(), 1);
    assert_eq!(market.cart("buyer1").unwrap().cart.quantity_of("p1"), 4);
    assert_eq!(market.cart("buyer2").unwrap().cart.quantity_of("p1"), 3);
    assert_carts_within_stock(&market);

    market.update_product("seller1", "p1", draft_from(&p1, 0)).unwrap();
    assert!(market.cart("buyer1").unwrap().cart.is_empty());
    assert_carts_within_stock(&market);
  }

  #[test]
  fn deleting_a_product_purges_carts_and_favorites() {
    let market = market();
    market.add_to_cart("buyer1", "p8", 2).unwrap();
    let removal = market.delete_product("seller3", "p8").unwrap();
    assert_eq!(removal.cart_lines_removed, 1);
    assert_eq!(removal.favorites_removed, 1);
    assert!(!market.is_favorite("buyer1", "p8"));
    assert!(market.cart("buyer1").unwrap().cart.is_empty());
  }

  #[test]
  fn disabling_a_product_removes_it_from_carts() {
    let market = market();
    market.add_to_cart("buyer2", "p6", 1).unwrap();
    let change = market.toggle_product_status("seller2", "p6").unwrap();
    assert!(!change.product.active);
    assert_eq!(change.reconciled[0].change, LineChange::Removed { from: 1 });
    assert!(matches!(market.add_to_cart("buyer2", "p6", 1), Err(AppError::NotFound(_))));

    let change = market.toggle_product_status("seller2", "p6").unwrap();
    assert!(change.product.active);
    assert!(market.add_to_cart("buyer2", "p6", 1).is_ok());
  }

  #[test]
  fn completed_order_decrements_stock_and_reconciles_other_carts() {
    let market = market();
    market.add_to_cart("buyer1", "p4", 2).unwrap();
    market.add_to_cart("buyer1", "p9", 1).unwrap();
    market.add_to_cart("buyer2", "p4", 3).unwrap();

    let cart = market.checkout_cart("buyer1").unwrap();
    let order = market.complete_order("buyer1", Uuid::new_v4(), &cart.items).unwrap();

    assert_eq!(order.transactions.len(), 2);
    assert_eq!(order.total, Decimal::from(120 * 2 + 28));
    assert_eq!(market.catalog().product("p4").unwrap().inventory, 1);
    assert_eq!(market.catalog().product("p9").unwrap().inventory, 11);
    assert!(market.cart("buyer1").unwrap().cart.is_empty());
    assert_eq!(market.cart("buyer2").unwrap().cart.quantity_of("p4"), 1);
    assert_eq!(market.transactions_for_buyer("buyer1").len(), 2);
    assert_eq!(market.transactions_for_seller("seller3").len(), 2);
    assert_carts_within_stock(&market);
  }

  #[test]
  fn order_exceeding_current_stock_changes_nothing() {
    let market = market();
    market.add_to_cart("buyer1", "p6", 2).unwrap();
    let cart = market.checkout_cart("buyer1").unwrap();
    market.add_to_cart("buyer2", "p6", 2).unwrap();
    let other = market.checkout_cart("buyer2").unwrap();
    market.complete_order("buyer2", Uuid::new_v4(), &other.items).unwrap();

    let err = market.complete_order("buyer1", Uuid::new_v4(), &cart.items).unwrap_err();
    assert!(matches!(err, AppError::Validation(_) | AppError::NotFound(_)));
    assert_eq!(market.catalog().product("p6").unwrap().inventory, 0);
    assert_eq!(market.transactions_for_buyer("buyer1").len(), 0);
  }

  #[test]
  fn order_for_a_cart_changed_after_payment_is_refused() {
    let market = market();
    market.add_to_cart("buyer1", "p1", 2).unwrap();
    let paid = market.checkout_cart("buyer1").unwrap();
    market.add_to_cart("buyer1", "p2", 1).unwrap();

    let err = market.complete_order("buyer1", Uuid::new_v4(), &paid.items).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let cart = market.cart("buyer1").unwrap().cart;
    assert_eq!(cart.quantity_of("p1"), 2);
    assert_eq!(cart.quantity_of("p2"), 1);
    assert_eq!(market.catalog().product("p1").unwrap().inventory, 15);
    assert!(market.transactions_for_buyer("buyer1").is_empty());

    market.set_cart_quantity("buyer1", "p1", 3).unwrap();
    market.remove_from_cart("buyer1", "p2").unwrap();
    let err = market.complete_order("buyer1", Uuid::new_v4(), &paid.items).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(market.catalog().product("p1").unwrap().inventory, 15);
  }

  #[test]
  fn same_cart_is_booked_only_once() {
    let market = market();
    market.add_to_cart("buyer1", "p9", 2).unwrap();
    let paid = market.checkout_cart("buyer1").unwrap();

    market.complete_order("buyer1", Uuid::new_v4(), &paid.items).unwrap();
    let err = market.complete_order("buyer1", Uuid::new_v4(), &paid.items).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(market.catalog().product("p9").unwrap().inventory, 10);
    assert_eq!(market.transactions_for_buyer("buyer1").len(), 1);
  }

  #[test]
  fn order_taking_the_last_unit_empties_stock() {
    let market = market();
    market.add_to_cart("buyer1", "p6", 2).unwrap();
    market.add_to_cart("buyer2", "p6", 1).unwrap();
    let paid = market.checkout_cart("buyer1").unwrap();
    market.complete_order("buyer1", Uuid::new_v4(), &paid.items).unwrap();

    assert_eq!(market.catalog().product("p6").unwrap().inventory, 0);
    assert!(market.cart("buyer2").unwrap().cart.is_empty());
    assert_carts_within_stock(&market);
  }

  #[test]
  fn empty_cart_cannot_be_checked_out() {
    let market = market();
    assert!(matches!(market.checkout_cart("buyer1"), Err(AppError::Validation(_))));
    assert!(matches!(market.checkout_cart("nobody"), Err(AppError::NotFound(_))));
  }

  #[test]
  fn messages_require_a_known_seller_and_content() {
    let market = market();
    assert!(matches!(
      market.send_message("buyer1", "seller1", "   "),
      Err(AppError::Validation(_))
    ));
    assert!(matches!(
      market.send_message("buyer1", "seller9", "Hello"),
      Err(AppError::NotFound(_))
    ));
    let sent = market.send_message("buyer1", "seller1", "  Any larger mugs?  ").unwrap();
    assert_eq!(sent.content, "Any larger mugs?");

    let thread = market.conversation("buyer1", "seller1").unwrap();
    assert_eq!(thread.len(), 3);
    assert_eq!(thread.last().unwrap().id, sent.id);
    assert_eq!(market.inbox("buyer1").unwrap().unread_count, 1);
    assert_eq!(market.mark_conversation_read("buyer1", "seller1").unwrap(), 1);
    assert_eq!(market.inbox("buyer1").unwrap().unread_count, 0);
  }

  #[test]
  fn conversations_require_a_known_buyer() {
    let market = market();
    assert!(matches!(market.conversation("ghost", "seller1"), Err(AppError::NotFound(_))));
    assert!(matches!(
      market.mark_conversation_read("ghost", "seller1"),
      Err(AppError::NotFound(_))
    ));
  }

  #[test]
  fn favorites_follow_catalog_order() {
    let market = market();
    assert!(market.toggle_favorite("buyer1", "p3").unwrap());
    let ids: Vec<String> = market
      .favorite_products("buyer1")
      .unwrap()
      .into_iter()
      .map(|p| p.id)
      .collect();
    assert_eq!(ids, vec!["p1", "p3", "p8"]);
    assert!(matches!(market.toggle_favorite("buyer1", "p99"), Err(AppError::NotFound(_))));
  }

  #[test]
  fn switching_to_an_unknown_buyer_is_rejected() {
    let market = market();
    assert_eq!(market.current_buyer().as_deref(), Some("buyer1"));
    assert!(matches!(market.switch_buyer("buyer7"), Err(AppError::NotFound(_))));
    assert_eq!(market.switch_buyer("buyer2").unwrap().name, "Jamie Wong");
    assert_eq!(market.current_buyer().as_deref(), Some("buyer2"));
  }
}
