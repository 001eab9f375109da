// kiln-market/src/web/handlers/seller_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use super::run_flow;
use crate::errors::AppError;
use crate::models::ProductDraft;
use crate::pipelines::contexts::{ProductAction, ProductActionCtxData, SaveProductCtxData};
use crate::state::AppState;

#[instrument(name = "handler::seller_dashboard", skip(app_state, path), fields(seller_id = %path.as_ref()))]
pub async fn dashboard_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();
  let dashboard = app_state.market.dashboard(&seller_id)?;
  let transactions = app_state.market.transactions_for_seller(&seller_id);
  Ok(HttpResponse::Ok().json(json!({
    "seller": dashboard.seller,
    "activeProducts": dashboard.active,
    "inactiveProducts": dashboard.inactive,
    "transactions": transactions,
  })))
}

#[instrument(name = "handler::create_product", skip(app_state, path, req_payload), fields(seller_id = %path.as_ref()))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<ProductDraft>,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();
  let ctx = SaveProductCtxData::new(app_state.get_ref().clone(), &seller_id, None, req_payload.into_inner());
  let done = run_flow(&app_state, ctx).await?;
  let product = done
    .saved
    .ok_or_else(|| AppError::Internal("Product save completed without a product.".to_string()))?;
  info!(product_id = %product.id, "Product created from the dashboard.");
  Ok(HttpResponse::Created().json(json!({
    "product": product,
    "notices": done.notices,
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, path, req_payload), fields(seller_id = %path.0, product_id = %path.1))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
  req_payload: web::Json<ProductDraft>,
) -> Result<HttpResponse, AppError> {
  let (seller_id, product_id) = path.into_inner();
  let ctx = SaveProductCtxData::new(
    app_state.get_ref().clone(),
    &seller_id,
    Some(&product_id),
    req_payload.into_inner(),
  );
  let done = run_flow(&app_state, ctx).await?;
  let product = done
    .saved
    .ok_or_else(|| AppError::Internal("Product save completed without a product.".to_string()))?;
  Ok(HttpResponse::Ok().json(json!({
    "product": product,
    "cartLinesAdjusted": done.reconciled.len(),
    "notices": done.notices,
  })))
}

async fn run_product_action(
  app_state: web::Data<AppState>,
  seller_id: &str,
  product_id: &str,
  action: ProductAction,
) -> Result<ProductActionCtxData, AppError> {
  let ctx = ProductActionCtxData::new(app_state.get_ref().clone(), seller_id, product_id, action);
  run_flow(&app_state, ctx).await
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(seller_id = %path.0, product_id = %path.1))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (seller_id, product_id) = path.into_inner();
  let done = run_product_action(app_state, &seller_id, &product_id, ProductAction::Delete).await?;
  Ok(HttpResponse::Ok().json(json!({
    "deletedProductId": product_id,
    "cartLinesRemoved": done.cart_lines_removed,
    "notices": done.notices,
  })))
}

#[instrument(name = "handler::duplicate_product", skip(app_state, path), fields(seller_id = %path.0, product_id = %path.1))]
pub async fn duplicate_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (seller_id, product_id) = path.into_inner();
  let done = run_product_action(app_state, &seller_id, &product_id, ProductAction::Duplicate).await?;
  Ok(HttpResponse::Created().json(json!({
    "product": done.product,
    "notices": done.notices,
  })))
}

#[instrument(name = "handler::toggle_product_status", skip(app_state, path), fields(seller_id = %path.0, product_id = %path.1))]
pub async fn toggle_product_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (seller_id, product_id) = path.into_inner();
  let done = run_product_action(app_state, &seller_id, &product_id, ProductAction::ToggleStatus).await?;
  Ok(HttpResponse::Ok().json(json!({
    "product": done.product,
    "cartLinesRemoved": done.cart_lines_removed,
    "notices": done.notices,
  })))
}
