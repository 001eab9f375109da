// kiln-market/src/models/cart.rs

//! A buyer's cart and the quantity rules that keep it consistent with inventory.
//!
//! Every line's quantity lies in `1..=inventory` of its product: quantities are
//! clamped to the stock available when they are set, a quantity that ends up
//! at zero removes the line, and a product never has more than one line.
//! Totals are derived from the lines on every read.

use crate::models::product::Product;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub product_id: String,
  pub seller_id: String,
  pub quantity: u32,
  /// Unit price captured when the line was created.
  pub price: Decimal,
  pub title: String,
  pub image: String,
}

impl CartItem {
  pub fn from_product(product: &Product, quantity: u32) -> Self {
    Self {
      product_id: product.id.clone(),
      seller_id: product.seller_id.clone(),
      quantity,
      price: product.price,
      title: product.title.clone(),
      image: product.primary_image().to_string(),
    }
  }

  /// Price × quantity, saturating at `Decimal::MAX`.
  pub fn line_total(&self) -> Decimal {
    self.price.saturating_mul(Decimal::from(self.quantity))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub buyer_id: String,
  pub items: Vec<CartItem>,
  pub updated_at: DateTime<Utc>,
}

/// What a quantity operation did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineChange {
  Added { quantity: u32 },
  Updated { from: u32, to: u32 },
  Removed { from: u32 },
  Unchanged,
}

/// Raised when more units were asked for than the product has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockShortfall {
  pub product_id: String,
  pub requested: i64,
  pub available: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityOutcome {
  pub change: LineChange,
  pub shortfall: Option<StockShortfall>,
}

impl QuantityOutcome {
  fn new(change: LineChange, shortfall: Option<StockShortfall>) -> Self {
    Self { change, shortfall }
  }
}

/// Cart plus its derived totals, the shape handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  #[serde(flatten)]
  pub cart: Cart,
  pub total: Decimal,
  pub item_count: u64,
}

impl Cart {
  pub fn new(buyer_id: impl Into<String>) -> Self {
    Self {
      buyer_id: buyer_id.into(),
      items: Vec::new(),
      updated_at: Utc::now(),
    }
  }

  pub fn line(&self, product_id: &str) -> Option<&CartItem> {
    self.items.iter().find(|item| item.product_id == product_id)
  }

  pub fn quantity_of(&self, product_id: &str) -> u32 {
    self.line(product_id).map_or(0, |item| item.quantity)
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Sum of price × quantity over all lines.
  pub fn total(&self) -> Decimal {
    self
      .items
      .iter()
      .map(CartItem::line_total)
      .fold(Decimal::ZERO, Decimal::saturating_add)
  }

  /// Sum of quantities over all lines. Widened so lines at full `u32` stock cannot overflow it.
  pub fn item_count(&self) -> u64 {
    self.items.iter().map(|item| u64::from(item.quantity)).sum()
  }

  pub fn view(&self) -> CartView {
    CartView {
      cart: self.clone(),
      total: self.total(),
      item_count: self.item_count(),
    }
  }

  fn touch(&mut self) {
    self.updated_at = Utc::now();
  }

  /// Adds `quantity` units of `product`.
  ///
  /// An existing line is merged through [`Cart::set_quantity`] with the summed
  /// quantity; a new line is clamped to the product's inventory the same way.
  pub fn add(&mut self, product: &Product, quantity: u32) -> QuantityOutcome {
    if let Some(existing) = self.line(&product.id) {
      let merged = i64::from(existing.quantity) + i64::from(quantity);
      return self.set_quantity(&product.id, merged, product.inventory);
    }

    let shortfall = (quantity > product.inventory).then(|| StockShortfall {
      product_id: product.id.clone(),
      requested: i64::from(quantity),
      available: product.inventory,
    });
    let granted = quantity.min(product.inventory);
    if granted == 0 {
      return QuantityOutcome::new(LineChange::Unchanged, shortfall);
    }

    self.items.push(CartItem::from_product(product, granted));
    self.touch();
    QuantityOutcome::new(LineChange::Added { quantity: granted }, shortfall)
  }

  /// Sets the line for `product_id` to `quantity`, clamped to `[0, inventory]`.
  /// Zero or less removes the line. A product without a line is left alone.
  pub fn set_quantity(&mut self, product_id: &str, quantity: i64, inventory: u32) -> QuantityOutcome {
    let mut target = quantity;
    let mut shortfall = None;
    if quantity > i64::from(inventory) {
      shortfall = Some(StockShortfall {
        product_id: product_id.to_string(),
        requested: quantity,
        available: inventory,
      });
      target = i64::from(inventory);
    }

    if target <= 0 {
      let change = match self.remove(product_id) {
        Some(removed) => LineChange::Removed { from: removed.quantity },
        None => LineChange::Unchanged,
      };
      return QuantityOutcome::new(change, shortfall);
    }

    // target is in 1..=inventory here, so it fits in u32.
    let target = target as u32;
    let change = match self.items.iter_mut().find(|item| item.product_id == product_id) {
      Some(item) if item.quantity != target => {
        let from = item.quantity;
        item.quantity = target;
        LineChange::Updated { from, to: target }
      }
      _ => LineChange::Unchanged,
    };
    if change != LineChange::Unchanged {
      self.touch();
    }
    QuantityOutcome::new(change, shortfall)
  }

  pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
    let idx = self.items.iter().position(|item| item.product_id == product_id)?;
    let removed = self.items.remove(idx);
    self.touch();
    Some(removed)
  }

  /// Empties the cart and returns how many lines were dropped.
  pub fn clear(&mut self) -> usize {
    let dropped = self.items.len();
    self.items.clear();
    self.touch();
    dropped
  }

  /// Brings the line for `product_id` back under a changed inventory.
  pub fn reconcile(&mut self, product_id: &str, inventory: u32) -> LineChange {
    match self.line(product_id) {
      Some(item) if item.quantity > inventory => self.set_quantity(product_id, i64::from(inventory), inventory).change,
      _ => LineChange::Unchanged,
    }
  }
}
