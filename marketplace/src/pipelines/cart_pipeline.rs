// kiln-market/src/pipelines/cart_pipeline.rs

//! Add, set-quantity, remove and clear flows over a buyer's cart.

use crate::errors::AppError;
use crate::models::{LineChange, Notice};
use crate::pipelines::common_steps::{quantity_notices, removed_from_cart, resolve_buyer};
use crate::pipelines::contexts::{AddToCartCtxData, ClearCartCtxData, RemoveCartItemCtxData, UpdateCartItemCtxData};
use kiln_flow::{Flow, FlowContext, FlowRegistry, SkipCondition, StepControl};
use std::sync::Arc;
use tracing::{info, warn};

pub fn register_add_to_cart_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<AddToCartCtxData, AppError>::new(&[
    ("resolve_buyer", false, None),
    ("validate_quantity", false, None),
    ("apply_to_cart", false, None),
    ("notify", false, None),
  ]);

  f.on("resolve_buyer", resolve_buyer::<AddToCartCtxData>);

  f.on("validate_quantity", |ctx: FlowContext<AddToCartCtxData>| async move {
    let quantity = ctx.read().quantity;
    if quantity < 1 {
      warn!(quantity, "Add to cart rejected: quantity must be positive.");
      return Err(AppError::Validation("Quantity must be at least 1.".to_string()));
    }
    Ok(StepControl::Continue)
  });

  f.on("apply_to_cart", |ctx: FlowContext<AddToCartCtxData>| async move {
    let mutation = {
      let guard = ctx.read();
      let quantity = u32::try_from(guard.quantity).unwrap_or(u32::MAX);
      guard.app_state.market.add_to_cart(&guard.buyer_id, &guard.product_id, quantity)?
    };
    info!(
      product_id = %mutation.product.id,
      change = ?mutation.outcome.change,
      item_count = mutation.cart.item_count,
      "Cart add applied."
    );
    ctx.write().result = Some(mutation);
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("notify", |ctx: FlowContext<AddToCartCtxData>| async move {
    let mut guard = ctx.write();
    let notices = guard
      .result
      .as_ref()
      .map(|r| quantity_notices(&r.product, &r.outcome))
      .unwrap_or_default();
    guard.notices.extend(notices);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Add to cart flow registered.");
}

pub fn register_update_cart_item_flow(registry: &FlowRegistry<AppError>) {
  let nothing_to_report: SkipCondition<UpdateCartItemCtxData> = Arc::new(|ctx: FlowContext<UpdateCartItemCtxData>| {
    let quiet = ctx.read().result.as_ref().map_or(true, |r| {
      r.outcome.change == LineChange::Unchanged && r.outcome.shortfall.is_none()
    });
    quiet
  });

  let mut f = Flow::<UpdateCartItemCtxData, AppError>::new(&[
    ("resolve_buyer", false, None),
    ("apply_quantity", false, None),
    ("notify", false, Some(nothing_to_report)),
  ]);

  f.on("resolve_buyer", resolve_buyer::<UpdateCartItemCtxData>);

  f.on("apply_quantity", |ctx: FlowContext<UpdateCartItemCtxData>| async move {
    let mutation = {
      let guard = ctx.read();
      guard
        .app_state
        .market
        .set_cart_quantity(&guard.buyer_id, &guard.product_id, guard.quantity)?
    };
    info!(product_id = %mutation.product.id, change = ?mutation.outcome.change, "Cart quantity applied.");
    ctx.write().result = Some(mutation);
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("notify", |ctx: FlowContext<UpdateCartItemCtxData>| async move {
    let mut guard = ctx.write();
    let notices = guard
      .result
      .as_ref()
      .map(|r| quantity_notices(&r.product, &r.outcome))
      .unwrap_or_default();
    guard.notices.extend(notices);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Update cart item flow registered.");
}

pub fn register_remove_cart_item_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<RemoveCartItemCtxData, AppError>::new(&[
    ("resolve_buyer", false, None),
    ("remove_line", false, None),
  ]);

  f.on("resolve_buyer", resolve_buyer::<RemoveCartItemCtxData>);

  f.on("remove_line", |ctx: FlowContext<RemoveCartItemCtxData>| async move {
    let (removed, cart) = {
      let guard = ctx.read();
      guard.app_state.market.remove_from_cart(&guard.buyer_id, &guard.product_id)?
    };
    let mut guard = ctx.write();
    if removed.is_some() {
      guard.notices.push(removed_from_cart());
    }
    guard.removed = removed;
    guard.cart = Some(cart);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Remove cart item flow registered.");
}

pub fn register_clear_cart_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<ClearCartCtxData, AppError>::new(&[("resolve_buyer", false, None), ("clear", false, None)]);

  f.on("resolve_buyer", resolve_buyer::<ClearCartCtxData>);

  f.on("clear", |ctx: FlowContext<ClearCartCtxData>| async move {
    let cart = {
      let guard = ctx.read();
      guard.app_state.market.clear_cart(&guard.buyer_id)?
    };
    let mut guard = ctx.write();
    guard.cart = Some(cart);
    guard
      .notices
      .push(Notice::info("Cart Cleared", "All items have been removed from your cart."));
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Clear cart flow registered.");
}
