// kiln-market/src/pipelines/product_pipeline.rs

//! Seller dashboard flows: saving the product editor and the per-product actions.

use crate::errors::AppError;
use crate::models::Notice;
use crate::pipelines::contexts::{ProductAction, ProductActionCtxData, SaveProductCtxData};
use kiln_flow::{Flow, FlowContext, FlowRegistry, StepControl};
use tracing::{info, warn};

pub fn register_save_product_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<SaveProductCtxData, AppError>::new(&[
    ("validate_draft", false, None),
    ("persist", false, None),
    ("notify", false, None),
  ]);

  f.on("validate_draft", |ctx: FlowContext<SaveProductCtxData>| async move {
    let guard = ctx.read();
    let categories = guard.app_state.market.catalog().assignable_categories();
    if let Err(errors) = guard.draft.validate(&categories) {
      warn!(
        seller_id = %guard.seller_id,
        fields = ?errors.keys().collect::<Vec<_>>(),
        "Product draft rejected."
      );
      return Err(AppError::InvalidForm(errors));
    }
    Ok(StepControl::Continue)
  });

  f.on("persist", |ctx: FlowContext<SaveProductCtxData>| async move {
    let (saved, reconciled) = {
      let guard = ctx.read();
      let market = &guard.app_state.market;
      match &guard.product_id {
        None => (market.create_product(&guard.seller_id, guard.draft.clone())?, Vec::new()),
        Some(product_id) => {
          let change = market.update_product(&guard.seller_id, product_id, guard.draft.clone())?;
          (change.product, change.reconciled)
        }
      }
    };
    let mut guard = ctx.write();
    guard.saved = Some(saved);
    guard.reconciled = reconciled;
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("notify", |ctx: FlowContext<SaveProductCtxData>| async move {
    let mut guard = ctx.write();
    let title = guard.saved.as_ref().map(|p| p.title.clone()).unwrap_or_default();
    let notice = if guard.is_new() {
      Notice::info("Product Created", format!("\"{}\" has been created successfully.", title))
    } else {
      Notice::info("Product Updated", format!("\"{}\" has been updated successfully.", title))
    };
    guard.notices.push(notice);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Save product flow registered.");
}

pub fn register_product_action_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<ProductActionCtxData, AppError>::new(&[("perform", false, None), ("notify", false, None)]);

  f.on("perform", |ctx: FlowContext<ProductActionCtxData>| async move {
    let (product, cart_lines_removed) = {
      let guard = ctx.read();
      let market = &guard.app_state.market;
      match guard.action {
        ProductAction::Delete => {
          let removal = market.delete_product(&guard.seller_id, &guard.product_id)?;
          (removal.product, removal.cart_lines_removed)
        }
        ProductAction::Duplicate => (market.duplicate_product(&guard.seller_id, &guard.product_id)?, 0),
        ProductAction::ToggleStatus => {
          let change = market.toggle_product_status(&guard.seller_id, &guard.product_id)?;
          (change.product, change.reconciled.len())
        }
      }
    };
    let mut guard = ctx.write();
    guard.product = Some(product);
    guard.cart_lines_removed = cart_lines_removed;
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("notify", |ctx: FlowContext<ProductActionCtxData>| async move {
    let mut guard = ctx.write();
    let now_active = guard.product.as_ref().map_or(false, |p| p.active);
    let notice = match guard.action {
      ProductAction::Delete => Notice::info("Product Deleted", "The product has been permanently removed."),
      ProductAction::Duplicate => Notice::info(
        "Product Duplicated",
        "A copy of the product has been created. You can now edit it.",
      ),
      ProductAction::ToggleStatus if now_active => {
        Notice::info("Product Enabled", "The product has been enabled successfully.")
      }
      ProductAction::ToggleStatus => Notice::info("Product Disabled", "The product has been disabled successfully."),
    };
    guard.notices.push(notice);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Product action flow registered.");
}
