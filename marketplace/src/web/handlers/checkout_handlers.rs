// kiln-market/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::run_flow;
use crate::errors::AppError;
use crate::models::CheckoutForm;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::extractors::CurrentBuyer;

#[instrument(name = "handler::checkout", skip(app_state, req_payload, buyer), fields(buyer_id = %buyer.buyer_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutForm>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let ctx = CheckoutCtxData::new(app_state.get_ref().clone(), &buyer.buyer_id, req_payload.into_inner());
  let done = match run_flow(&app_state, ctx).await {
    Ok(done) => done,
    Err(e) => {
      warn!(error = %e, "Checkout failed.");
      return Err(e);
    }
  };

  let order = done.order.ok_or_else(|| {
    AppError::Internal("Checkout completed, but order confirmation details are unavailable.".to_string())
  })?;

  info!(
    order_id = %order.order_id,
    total = %order.total,
    email_sent = done.confirmation_email_sent,
    "Checkout completed."
  );

  Ok(HttpResponse::Ok().json(json!({
    "orderId": order.order_id.to_string(),
    "total": order.total,
    "transactions": order.transactions,
    "confirmationEmailSent": done.confirmation_email_sent,
    "notices": done.notices,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, buyer), fields(buyer_id = %buyer.buyer_id))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, buyer: CurrentBuyer) -> Result<HttpResponse, AppError> {
  let transactions = app_state.market.transactions_for_buyer(&buyer.buyer_id);
  Ok(HttpResponse::Ok().json(json!({ "transactions": transactions })))
}
