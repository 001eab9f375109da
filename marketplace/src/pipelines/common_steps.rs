// kiln-market/src/pipelines/common_steps.rs

//! Steps and notice builders shared by several flows.

use crate::errors::AppError;
use crate::models::{LineChange, Notice, Product, QuantityOutcome};
use crate::pipelines::contexts::{BuyerScoped, CheckoutCtxData};
use crate::services::email_mock;
use kiln_flow::{FlowContext, StepControl};
use tracing::{info, instrument, warn};

/// Fails the flow early when the acting buyer does not exist.
#[instrument(name = "common_step::resolve_buyer", skip_all, err(Display))]
pub async fn resolve_buyer<T>(ctx: FlowContext<T>) -> Result<StepControl, AppError>
where
  T: BuyerScoped + Send + Sync + 'static,
{
  let guard = ctx.read();
  let buyer = guard.app_state().market.buyer(guard.buyer_id())?;
  tracing::debug!(buyer_id = %buyer.id, "Buyer resolved.");
  Ok(StepControl::Continue)
}

pub fn insufficient_stock(available: u32) -> Notice {
  Notice::destructive("Insufficient Stock", format!("Sorry, only {} units available.", available))
}

pub fn removed_from_cart() -> Notice {
  Notice::info("Removed from Cart", "Item has been removed from your cart.")
}

/// Notices for a quantity change: the stock warning first, then what happened to the line.
pub fn quantity_notices(product: &Product, outcome: &QuantityOutcome) -> Vec<Notice> {
  let mut notices = Vec::new();
  if let Some(shortfall) = &outcome.shortfall {
    notices.push(insufficient_stock(shortfall.available));
  }
  match outcome.change {
    LineChange::Added { .. } => notices.push(Notice::info(
      "Added to Cart",
      format!("{} has been added to your cart.", product.title),
    )),
    LineChange::Removed { .. } => notices.push(removed_from_cart()),
    LineChange::Updated { .. } | LineChange::Unchanged => {}
  }
  notices
}

/// Best-effort order confirmation: a delivery failure is logged and the flow goes on.
#[instrument(name = "common_step::send_order_confirmation", skip_all)]
pub async fn send_order_confirmation_email_step(ctx: FlowContext<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let (recipient_email, recipient_name, sender, order_id, total) = {
    let guard = ctx.read();
    let total = guard.order.as_ref().map(|o| o.total).unwrap_or_default();
    (
      guard.form.email.clone(),
      guard.form.name.clone(),
      guard.app_state.config.order_email_sender.clone(),
      guard.order_id,
      total,
    )
  };

  let sent = email_mock::send_mock_email(
    &recipient_email,
    &sender,
    &format!("Your Kiln order #{} is confirmed", order_id),
    &format!(
      "<p>Hi {},</p><p>Your order #{} for ${:.2} has been placed.</p><p>Thank you for supporting our artisans!</p>",
      recipient_name, order_id, total
    ),
  )
  .await;

  match sent {
    Ok(sent_info) => {
      info!(
        "Order confirmation email sent to {}. Message ID: {}",
        recipient_email, sent_info.message_id
      );
      ctx.write().confirmation_email_sent = true;
    }
    Err(e) => {
      warn!(%order_id, error = %e, "Order confirmation email could not be sent.");
    }
  }
  Ok(StepControl::Continue)
}
