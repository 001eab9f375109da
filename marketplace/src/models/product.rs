// kiln-market/src/models/product.rs

use crate::errors::FieldErrors;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub seller_id: String,
  pub title: String,
  pub description: String,
  pub price: Decimal,
  pub images: Vec<String>,
  pub category: String,
  pub tags: Vec<String>,
  pub featured: bool,
  pub inventory: u32,
  /// Disabled from the seller dashboard: hidden from browsing and not purchasable.
  #[serde(default = "default_active")]
  pub active: bool,
}

fn default_active() -> bool {
  true
}

impl Product {
  /// First image, used as the cart thumbnail. Empty when the product has none.
  pub fn primary_image(&self) -> &str {
    self.images.first().map(String::as_str).unwrap_or("")
  }

  /// Case-insensitive match on title, description or any tag. `needle` must already be lowercase.
  pub fn matches_search(&self, needle: &str) -> bool {
    self.title.to_lowercase().contains(needle)
      || self.description.to_lowercase().contains(needle)
      || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
  }

  /// Copies a draft that already passed [`ProductDraft::validate`]; `inventory`
  /// is the draft's stock as returned by [`ProductDraft::stock_units`].
  pub(crate) fn apply_draft(&mut self, draft: ProductDraft, inventory: u32) {
    debug_assert_eq!(i64::from(inventory), draft.inventory);
    self.tags = draft.normalized_tags();
    self.title = draft.title.trim().to_string();
    self.description = draft.description.trim().to_string();
    self.price = draft.price;
    self.category = draft.category;
    self.images = draft.images;
    self.inventory = inventory;
    self.featured = draft.featured;
  }
}

/// What the seller's product editor submits for a create or an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
  pub title: String,
  pub description: String,
  pub price: Decimal,
  pub category: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub images: Vec<String>,
  /// Signed so a negative value reaches validation instead of failing deserialization.
  pub inventory: i64,
  #[serde(default)]
  pub featured: bool,
}

impl ProductDraft {
  pub const MIN_TITLE_CHARS: usize = 3;
  pub const MIN_DESCRIPTION_CHARS: usize = 10;
  /// Largest unit price a listing may carry, in whole currency units.
  pub const MAX_PRICE_UNITS: i64 = 1_000_000;
  pub const MAX_INVENTORY: i64 = 100_000;

  /// The draft's inventory as stock units, when it is within `0..=MAX_INVENTORY`.
  pub fn stock_units(&self) -> Option<u32> {
    if (0..=Self::MAX_INVENTORY).contains(&self.inventory) {
      u32::try_from(self.inventory).ok()
    } else {
      None
    }
  }

  /// Trimmed, de-duplicated tags in submission order.
  pub fn normalized_tags(&self) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
    for tag in self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
      if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
      }
    }
    tags
  }

  /// Checks every field and reports all failures at once, keyed by field name.
  /// `categories` are the assignable categories (the "All" pseudo-category excluded).
  pub fn validate(&self, categories: &[String]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if self.title.trim().chars().count() < Self::MIN_TITLE_CHARS {
      errors.insert("title".into(), "Title must be at least 3 characters".into());
    }
    if self.description.trim().chars().count() < Self::MIN_DESCRIPTION_CHARS {
      errors.insert("description".into(), "Description must be at least 10 characters".into());
    }
    if self.price <= Decimal::ZERO {
      errors.insert("price".into(), "Price must be a positive number".into());
    } else if self.price > Decimal::from(Self::MAX_PRICE_UNITS) {
      errors.insert("price".into(), format!("Price cannot exceed {}", Self::MAX_PRICE_UNITS));
    }
    if self.category.trim().is_empty() {
      errors.insert("category".into(), "Please select a category".into());
    } else if !categories.iter().any(|c| c == &self.category) {
      errors.insert("category".into(), format!("Unknown category '{}'", self.category));
    }
    if self.normalized_tags().is_empty() {
      errors.insert("tags".into(), "Add at least one tag".into());
    }
    if self.inventory < 0 {
      errors.insert("inventory".into(), "Inventory must be a non-negative integer".into());
    } else if self.stock_units().is_none() {
      errors.insert(
        "inventory".into(),
        format!("Inventory cannot exceed {} units", Self::MAX_INVENTORY),
      );
    }
    if self.images.iter().all(|i| i.trim().is_empty()) {
      errors.insert("images".into(), "Please add at least one product image".into());
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }
}
