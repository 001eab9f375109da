// kiln-market/src/pipelines/mod.rs

//! Every multi-step mutation of the marketplace runs as a flow registered here.

use crate::errors::AppError;
use kiln_flow::FlowRegistry;

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod favorites_pipeline;
pub mod message_pipeline;
pub mod product_pipeline;

/// Registers one flow per context type. Called once while building `AppState`.
pub fn register_all_flows(registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering marketplace flows...");

  cart_pipeline::register_add_to_cart_flow(registry);
  cart_pipeline::register_update_cart_item_flow(registry);
  cart_pipeline::register_remove_cart_item_flow(registry);
  cart_pipeline::register_clear_cart_flow(registry);
  favorites_pipeline::register_toggle_favorite_flow(registry);
  message_pipeline::register_send_message_flow(registry);
  product_pipeline::register_save_product_flow(registry);
  product_pipeline::register_product_action_flow(registry);
  checkout_pipeline::register_checkout_flow(registry);

  tracing::info!(flows = registry.len(), "All marketplace flows registered.");
}
