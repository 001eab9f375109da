// kiln-market/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::run_flow;
use crate::errors::AppError;
use crate::pipelines::contexts::{AddToCartCtxData, ClearCartCtxData, RemoveCartItemCtxData, UpdateCartItemCtxData};
use crate::state::AppState;
use crate::web::extractors::CurrentBuyer;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
  pub product_id: String,
  #[serde(default = "default_quantity")]
  pub quantity: i64,
}

fn default_quantity() -> i64 {
  1
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityPayload {
  pub quantity: i64,
}

#[instrument(name = "handler::get_cart", skip(app_state, buyer), fields(buyer_id = %buyer.buyer_id))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, buyer: CurrentBuyer) -> Result<HttpResponse, AppError> {
  let cart = app_state.market.cart(&buyer.buyer_id)?;
  Ok(HttpResponse::Ok().json(json!({ "cart": cart })))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload, buyer),
  fields(buyer_id = %buyer.buyer_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartPayload>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx = AddToCartCtxData::new(
    app_state.get_ref().clone(),
    &buyer.buyer_id,
    &payload.product_id,
    payload.quantity,
  );
  let done = run_flow(&app_state, ctx).await?;
  let mutation = done
    .result
    .ok_or_else(|| AppError::Internal("Add to cart completed without a cart.".to_string()))?;

  info!(item_count = mutation.cart.item_count, "Add to cart finished.");
  Ok(HttpResponse::Ok().json(json!({
    "cart": mutation.cart,
    "change": mutation.outcome.change,
    "shortfall": mutation.outcome.shortfall,
    "notices": done.notices,
  })))
}

#[instrument(
  name = "handler::set_cart_quantity",
  skip(app_state, path, req_payload, buyer),
  fields(buyer_id = %buyer.buyer_id, product_id = %path.as_ref(), quantity = %req_payload.quantity)
)]
pub async fn set_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<SetQuantityPayload>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let ctx = UpdateCartItemCtxData::new(
    app_state.get_ref().clone(),
    &buyer.buyer_id,
    &product_id,
    req_payload.quantity,
  );
  let done = run_flow(&app_state, ctx).await?;
  let mutation = done
    .result
    .ok_or_else(|| AppError::Internal("Quantity update completed without a cart.".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
    "cart": mutation.cart,
    "change": mutation.outcome.change,
    "shortfall": mutation.outcome.shortfall,
    "notices": done.notices,
  })))
}

#[instrument(
  name = "handler::remove_cart_item",
  skip(app_state, path, buyer),
  fields(buyer_id = %buyer.buyer_id, product_id = %path.as_ref())
)]
pub async fn remove_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let ctx = RemoveCartItemCtxData::new(app_state.get_ref().clone(), &buyer.buyer_id, &product_id);
  let done = run_flow(&app_state, ctx).await?;
  Ok(HttpResponse::Ok().json(json!({
    "cart": done.cart,
    "removed": done.removed,
    "notices": done.notices,
  })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, buyer), fields(buyer_id = %buyer.buyer_id))]
pub async fn clear_cart_handler(app_state: web::Data<AppState>, buyer: CurrentBuyer) -> Result<HttpResponse, AppError> {
  let ctx = ClearCartCtxData::new(app_state.get_ref().clone(), &buyer.buyer_id);
  let done = run_flow(&app_state, ctx).await?;
  Ok(HttpResponse::Ok().json(json!({
    "cart": done.cart,
    "notices": done.notices,
  })))
}
