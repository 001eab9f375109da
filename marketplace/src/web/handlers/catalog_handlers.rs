// kiln-market/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct BrowseQuery {
  pub category: Option<String>,
  pub search: Option<String>,
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.market.catalog().categories();
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[instrument(name = "handler::browse_products", skip(app_state), fields(category = ?query.category, search = ?query.search))]
pub async fn browse_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<BrowseQuery>,
) -> Result<HttpResponse, AppError> {
  let products = app_state
    .market
    .catalog()
    .browse(query.category.as_deref(), query.search.as_deref());
  info!("Browse returned {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({
    "count": products.len(),
    "products": products,
  })))
}

#[instrument(name = "handler::featured_products", skip(app_state))]
pub async fn featured_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.market.catalog().featured_products();
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let (product, seller) = {
    let catalog = app_state.market.catalog();
    let product = catalog
      .product(&product_id)
      .filter(|p| p.active)
      .cloned()
      .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", product_id)))?;
    let seller = catalog.seller(&product.seller_id).cloned();
    (product, seller)
  };
  Ok(HttpResponse::Ok().json(json!({
    "product": product,
    "seller": seller,
  })))
}

#[instrument(name = "handler::list_sellers", skip(app_state))]
pub async fn list_sellers_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let sellers = app_state.market.catalog().sellers().to_vec();
  Ok(HttpResponse::Ok().json(json!({ "sellers": sellers })))
}

#[instrument(name = "handler::featured_sellers", skip(app_state))]
pub async fn featured_sellers_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let sellers = app_state.market.catalog().featured_sellers();
  Ok(HttpResponse::Ok().json(json!({ "sellers": sellers })))
}

#[instrument(name = "handler::get_seller", skip(app_state, path), fields(seller_id = %path.as_ref()))]
pub async fn get_seller_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();
  let catalog = app_state.market.catalog();
  let seller = catalog
    .seller(&seller_id)
    .cloned()
    .ok_or_else(|| AppError::NotFound(format!("Seller '{}' not found", seller_id)))?;
  let products = catalog.seller_products(&seller_id)?;
  Ok(HttpResponse::Ok().json(json!({
    "seller": seller,
    "products": products,
  })))
}

#[instrument(name = "handler::list_buyers", skip(app_state))]
pub async fn list_buyers_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let buyers = app_state.market.catalog().buyers().to_vec();
  Ok(HttpResponse::Ok().json(json!({ "buyers": buyers })))
}
