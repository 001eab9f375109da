// kiln-market/src/pipelines/checkout_pipeline.rs

//! Checkout: form check, payment, booking the order, confirmation email.

use crate::errors::AppError;
use crate::models::Notice;
use crate::pipelines::common_steps::{resolve_buyer, send_order_confirmation_email_step};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::payment_mock;
use kiln_flow::{Flow, FlowContext, FlowRegistry, StepControl};
use tracing::{error, info, warn};

pub const CHECKOUT_CURRENCY: &str = "USD";

pub fn register_checkout_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<CheckoutCtxData, AppError>::new(&[
    ("resolve_buyer", false, None),
    ("validate_form", false, None),
    ("load_cart", false, None),
    ("process_payment", false, None),
    ("record_order", false, None),
    ("send_confirmation", true, None),
    ("notify", false, None),
  ]);

  f.on("resolve_buyer", resolve_buyer::<CheckoutCtxData>);

  f.on("validate_form", |ctx: FlowContext<CheckoutCtxData>| async move {
    let guard = ctx.read();
    if let Err(errors) = guard.form.validate() {
      warn!(
        buyer_id = %guard.buyer_id,
        fields = ?errors.keys().collect::<Vec<_>>(),
        "Checkout form rejected."
      );
      return Err(AppError::InvalidForm(errors));
    }
    Ok(StepControl::Continue)
  });

  f.on("load_cart", |ctx: FlowContext<CheckoutCtxData>| async move {
    let cart = {
      let guard = ctx.read();
      guard.app_state.market.checkout_cart(&guard.buyer_id)?
    };
    info!(lines = cart.items.len(), total = %cart.total(), "Cart loaded for checkout.");
    ctx.write().cart = Some(cart);
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("process_payment", |ctx: FlowContext<CheckoutCtxData>| async move {
    let (order_id, amount, card_number, processing) = {
      let guard = ctx.read();
      let amount = guard
        .cart
        .as_ref()
        .map(|c| c.total())
        .ok_or_else(|| AppError::Internal("Payment step reached without a cart.".to_string()))?;
      (
        guard.order_id,
        amount,
        guard.form.card_number.clone(),
        guard.app_state.config.checkout_processing,
      )
    };

    let mut intent = payment_mock::create_mock_payment_intent(order_id, amount, CHECKOUT_CURRENCY).await?;
    let confirmed = payment_mock::confirm_mock_payment(&mut intent, &card_number, processing).await;
    ctx.write().payment = Some(intent);
    confirmed?;

    info!(%order_id, %amount, "Payment captured.");
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("record_order", |ctx: FlowContext<CheckoutCtxData>| async move {
    let placed = {
      let guard = ctx.read();
      let items = guard.cart.as_ref().map(|c| c.items.clone()).unwrap_or_default();
      guard
        .app_state
        .market
        .complete_order(&guard.buyer_id, guard.order_id, &items)
    };
    match placed {
      Ok(order) => {
        ctx.write().order = Some(order);
        Ok(StepControl::Continue)
      }
      Err(e) => {
        // Stock ran out between payment and booking; the mock charge is simply dropped.
        error!(order_id = %ctx.read().order_id, error = %e, "Paid order could not be booked.");
        Err(e)
      }
    }
  });

  f.on("send_confirmation", send_order_confirmation_email_step);

  f.on("notify", |ctx: FlowContext<CheckoutCtxData>| async move {
    ctx.write().notices.push(Notice::info(
      "Order Placed!",
      "Thank you for your order. We'll send a confirmation email shortly.",
    ));
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Checkout flow registered.");
}
