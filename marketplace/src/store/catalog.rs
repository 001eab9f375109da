// kiln-market/src/store/catalog.rs

//! Products, sellers and buyers, plus the seller-side product editor.

use crate::errors::{AppError, Result};
use crate::models::{Buyer, Product, ProductDraft, Seller};
use serde::Serialize;
use uuid::Uuid;

/// Pseudo-category matching every product.
pub const ALL_CATEGORIES: &str = "All";

const CATEGORIES: [&str; 4] = [ALL_CATEGORIES, "Kitchen", "Home", "Garden"];

/// A seller's products as the dashboard shows them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDashboard {
  pub seller: Seller,
  pub active: Vec<Product>,
  pub inactive: Vec<Product>,
}

#[derive(Debug, Default)]
pub struct Catalog {
  products: Vec<Product>,
  sellers: Vec<Seller>,
  buyers: Vec<Buyer>,
}

impl Catalog {
  pub fn new(sellers: Vec<Seller>, buyers: Vec<Buyer>, products: Vec<Product>) -> Self {
    Self {
      products,
      sellers,
      buyers,
    }
  }

  pub fn categories(&self) -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
  }

  /// Categories a product may be filed under.
  pub fn assignable_categories(&self) -> Vec<String> {
    CATEGORIES
      .iter()
      .filter(|c| **c != ALL_CATEGORIES)
      .map(|c| c.to_string())
      .collect()
  }

  pub fn product(&self, product_id: &str) -> Option<&Product> {
    self.products.iter().find(|p| p.id == product_id)
  }

  /// Product that can be bought right now.
  pub fn purchasable(&self, product_id: &str) -> Result<&Product> {
    match self.product(product_id) {
      Some(p) if p.active => Ok(p),
      _ => Err(AppError::NotFound(format!("Product '{}' not found", product_id))),
    }
  }

  pub fn products(&self) -> &[Product] {
    &self.products
  }

  /// Active products in catalog order, narrowed by category and search text.
  ///
  /// A missing, empty or `"All"` category matches everything; the search is
  /// case-insensitive over title, description and tags.
  pub fn browse(&self, category: Option<&str>, search: Option<&str>) -> Vec<Product> {
    let category = category.map(str::trim).filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

    self
      .products
      .iter()
      .filter(|p| p.active)
      .filter(|p| category.map_or(true, |c| p.category == c))
      .filter(|p| needle.as_deref().map_or(true, |n| p.matches_search(n)))
      .cloned()
      .collect()
  }

  pub fn featured_products(&self) -> Vec<Product> {
    self.products.iter().filter(|p| p.active && p.featured).cloned().collect()
  }

  pub fn sellers(&self) -> &[Seller] {
    &self.sellers
  }

  pub fn featured_sellers(&self) -> Vec<Seller> {
    self.sellers.iter().filter(|s| s.featured).cloned().collect()
  }

  pub fn seller(&self, seller_id: &str) -> Option<&Seller> {
    self.sellers.iter().find(|s| s.id == seller_id)
  }

  fn require_seller(&self, seller_id: &str) -> Result<&Seller> {
    self
      .seller(seller_id)
      .ok_or_else(|| AppError::NotFound(format!("Seller '{}' not found", seller_id)))
  }

  /// The seller's active products, as shown on their public profile.
  pub fn seller_products(&self, seller_id: &str) -> Result<Vec<Product>> {
    self.require_seller(seller_id)?;
    Ok(
      self
        .products
        .iter()
        .filter(|p| p.seller_id == seller_id && p.active)
        .cloned()
        .collect(),
    )
  }

  pub fn dashboard(&self, seller_id: &str) -> Result<SellerDashboard> {
    let seller = self.require_seller(seller_id)?.clone();
    let (active, inactive) = self
      .products
      .iter()
      .filter(|p| p.seller_id == seller_id)
      .cloned()
      .partition(|p| p.active);
    Ok(SellerDashboard {
      seller,
      active,
      inactive,
    })
  }

  pub fn buyers(&self) -> &[Buyer] {
    &self.buyers
  }

  pub fn buyer(&self, buyer_id: &str) -> Option<&Buyer> {
    self.buyers.iter().find(|b| b.id == buyer_id)
  }

  /// Next free `p<N>` id, continuing the seeded numbering.
  fn next_product_id(&self) -> String {
    let highest = self
      .products
      .iter()
      .filter_map(|p| p.id.strip_prefix('p').and_then(|n| n.parse::<u64>().ok()))
      .max()
      .unwrap_or(0);
    let candidate = format!("p{}", highest + 1);
    if self.product(&candidate).is_some() {
      format!("p-{}", Uuid::new_v4())
    } else {
      candidate
    }
  }

  fn owned_index(&self, seller_id: &str, product_id: &str) -> Result<usize> {
    self.require_seller(seller_id)?;
    self
      .products
      .iter()
      .position(|p| p.id == product_id && p.seller_id == seller_id)
      .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found for seller '{}'", product_id, seller_id)))
  }

  /// Validates a draft and hands back its stock units.
  fn checked_draft(&self, draft: &ProductDraft) -> Result<u32> {
    draft.validate(&self.assignable_categories()).map_err(AppError::InvalidForm)?;
    draft
      .stock_units()
      .ok_or_else(|| AppError::Internal("Validated draft has out-of-range inventory.".to_string()))
  }

  pub fn create_product(&mut self, seller_id: &str, draft: ProductDraft) -> Result<Product> {
    self.require_seller(seller_id)?;
    let inventory = self.checked_draft(&draft)?;

    let mut product = Product {
      id: self.next_product_id(),
      seller_id: seller_id.to_string(),
      title: String::new(),
      description: String::new(),
      price: draft.price,
      images: Vec::new(),
      category: String::new(),
      tags: Vec::new(),
      featured: false,
      inventory: 0,
      active: true,
    };
    product.apply_draft(draft, inventory);
    self.products.push(product.clone());
    Ok(product)
  }

  /// Replaces the editable fields of a product; returns `(before, after)`.
  pub fn update_product(&mut self, seller_id: &str, product_id: &str, draft: ProductDraft) -> Result<(Product, Product)> {
    let idx = self.owned_index(seller_id, product_id)?;
    let inventory = self.checked_draft(&draft)?;

    let before = self.products[idx].clone();
    self.products[idx].apply_draft(draft, inventory);
    Ok((before, self.products[idx].clone()))
  }

  pub fn delete_product(&mut self, seller_id: &str, product_id: &str) -> Result<Product> {
    let idx = self.owned_index(seller_id, product_id)?;
    Ok(self.products.remove(idx))
  }

  /// Copies a product under a new id, titled "<title> (Copy)" and not featured.
  pub fn duplicate_product(&mut self, seller_id: &str, product_id: &str) -> Result<Product> {
    let idx = self.owned_index(seller_id, product_id)?;
    let mut copy = self.products[idx].clone();
    copy.id = self.next_product_id();
    copy.title = format!("{} (Copy)", copy.title);
    copy.featured = false;
    self.products.push(copy.clone());
    Ok(copy)
  }

  pub fn toggle_active(&mut self, seller_id: &str, product_id: &str) -> Result<Product> {
    let idx = self.owned_index(seller_id, product_id)?;
    let product = &mut self.products[idx];
    product.active = !product.active;
    Ok(product.clone())
  }

  /// Takes sold units out of stock and returns the remaining inventory.
  pub fn decrement_inventory(&mut self, product_id: &str, quantity: u32) -> Result<u32> {
    let product = self
      .products
      .iter_mut()
      .find(|p| p.id == product_id)
      .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", product_id)))?;
    if quantity > product.inventory {
      return Err(AppError::Validation(format!(
        "Sorry, only {} units of '{}' available.",
        product.inventory, product.title
      )));
    }
    product.inventory -= quantity;
    Ok(product.inventory)
  }
}
