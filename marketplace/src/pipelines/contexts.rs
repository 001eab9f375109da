// kiln-market/src/pipelines/contexts.rs

//! Data carried through each flow. Handlers receive these wrapped in
//! `kiln_flow::FlowContext`; inputs are set by the caller, outputs are filled
//! in by the steps.

use crate::models::{Cart, CartItem, CartView, CheckoutForm, Message, Notice, Product, ProductDraft};
use crate::services::payment_mock::MockPaymentIntent;
use crate::state::AppState;
use crate::store::carts::ReconciledLine;
use crate::store::{CartMutation, PlacedOrder};
use uuid::Uuid;

/// Contexts that act on behalf of one buyer.
pub trait BuyerScoped {
  fn app_state(&self) -> &AppState;
  fn buyer_id(&self) -> &str;
}

macro_rules! buyer_scoped {
  ($($ctx:ty),+ $(,)?) => {
    $(
      impl BuyerScoped for $ctx {
        fn app_state(&self) -> &AppState {
          &self.app_state
        }

        fn buyer_id(&self) -> &str {
          &self.buyer_id
        }
      }
    )+
  };
}

// --- Cart ---

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub product_id: String,
  /// Signed so that zero and negative requests reach validation.
  pub quantity: i64,
  pub result: Option<CartMutation>,
  pub notices: Vec<Notice>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, buyer_id: &str, product_id: &str, quantity: i64) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      product_id: product_id.to_string(),
      quantity,
      result: None,
      notices: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct UpdateCartItemCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub product_id: String,
  pub quantity: i64,
  pub result: Option<CartMutation>,
  pub notices: Vec<Notice>,
}

impl UpdateCartItemCtxData {
  pub fn new(app_state: AppState, buyer_id: &str, product_id: &str, quantity: i64) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      product_id: product_id.to_string(),
      quantity,
      result: None,
      notices: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct RemoveCartItemCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub product_id: String,
  pub removed: Option<CartItem>,
  pub cart: Option<CartView>,
  pub notices: Vec<Notice>,
}

impl RemoveCartItemCtxData {
  pub fn new(app_state: AppState, buyer_id: &str, product_id: &str) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      product_id: product_id.to_string(),
      removed: None,
      cart: None,
      notices: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct ClearCartCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub cart: Option<CartView>,
  pub notices: Vec<Notice>,
}

impl ClearCartCtxData {
  pub fn new(app_state: AppState, buyer_id: &str) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      cart: None,
      notices: Vec::new(),
    }
  }
}

// --- Favorites & messages ---

#[derive(Clone)]
pub struct ToggleFavoriteCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub product_id: String,
  pub is_favorite: Option<bool>,
  pub notices: Vec<Notice>,
}

impl ToggleFavoriteCtxData {
  pub fn new(app_state: AppState, buyer_id: &str, product_id: &str) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      product_id: product_id.to_string(),
      is_favorite: None,
      notices: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct SendMessageCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub seller_id: String,
  pub content: String,
  pub sent: Option<Message>,
  pub notices: Vec<Notice>,
}

impl SendMessageCtxData {
  pub fn new(app_state: AppState, buyer_id: &str, seller_id: &str, content: &str) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      seller_id: seller_id.to_string(),
      content: content.to_string(),
      sent: None,
      notices: Vec::new(),
    }
  }
}

// --- Seller dashboard ---

/// Create (`product_id = None`) or update a product from the editor form.
#[derive(Clone)]
pub struct SaveProductCtxData {
  pub app_state: AppState,
  pub seller_id: String,
  pub product_id: Option<String>,
  pub draft: ProductDraft,
  pub saved: Option<Product>,
  pub reconciled: Vec<ReconciledLine>,
  pub notices: Vec<Notice>,
}

impl SaveProductCtxData {
  pub fn new(app_state: AppState, seller_id: &str, product_id: Option<&str>, draft: ProductDraft) -> Self {
    Self {
      app_state,
      seller_id: seller_id.to_string(),
      product_id: product_id.map(str::to_string),
      draft,
      saved: None,
      reconciled: Vec::new(),
      notices: Vec::new(),
    }
  }

  pub fn is_new(&self) -> bool {
    self.product_id.is_none()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
  Delete,
  Duplicate,
  ToggleStatus,
}

#[derive(Clone)]
pub struct ProductActionCtxData {
  pub app_state: AppState,
  pub seller_id: String,
  pub product_id: String,
  pub action: ProductAction,
  /// The deleted product, the new copy, or the toggled product.
  pub product: Option<Product>,
  pub cart_lines_removed: usize,
  pub notices: Vec<Notice>,
}

impl ProductActionCtxData {
  pub fn new(app_state: AppState, seller_id: &str, product_id: &str, action: ProductAction) -> Self {
    Self {
      app_state,
      seller_id: seller_id.to_string(),
      product_id: product_id.to_string(),
      action,
      product: None,
      cart_lines_removed: 0,
      notices: Vec::new(),
    }
  }
}

// --- Checkout ---

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub buyer_id: String,
  pub form: CheckoutForm,
  pub order_id: Uuid,
  pub cart: Option<Cart>,
  pub payment: Option<MockPaymentIntent>,
  pub order: Option<PlacedOrder>,
  pub confirmation_email_sent: bool,
  pub notices: Vec<Notice>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, buyer_id: &str, form: CheckoutForm) -> Self {
    Self {
      app_state,
      buyer_id: buyer_id.to_string(),
      form,
      order_id: Uuid::new_v4(),
      cart: None,
      payment: None,
      order: None,
      confirmation_email_sent: false,
      notices: Vec::new(),
    }
  }
}

buyer_scoped!(
  AddToCartCtxData,
  UpdateCartItemCtxData,
  RemoveCartItemCtxData,
  ClearCartCtxData,
  ToggleFavoriteCtxData,
  SendMessageCtxData,
  CheckoutCtxData,
);
