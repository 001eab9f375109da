// kiln-market/src/web/handlers/favorites_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use super::run_flow;
use crate::errors::AppError;
use crate::pipelines::contexts::ToggleFavoriteCtxData;
use crate::state::AppState;
use crate::web::extractors::CurrentBuyer;

#[instrument(name = "handler::list_favorites", skip(app_state, buyer), fields(buyer_id = %buyer.buyer_id))]
pub async fn list_favorites_handler(
  app_state: web::Data<AppState>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let products = app_state.market.favorite_products(&buyer.buyer_id)?;
  Ok(HttpResponse::Ok().json(json!({
    "count": products.len(),
    "products": products,
  })))
}

#[instrument(
  name = "handler::toggle_favorite",
  skip(app_state, path, buyer),
  fields(buyer_id = %buyer.buyer_id, product_id = %path.as_ref())
)]
pub async fn toggle_favorite_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let ctx = ToggleFavoriteCtxData::new(app_state.get_ref().clone(), &buyer.buyer_id, &product_id);
  let done = run_flow(&app_state, ctx).await?;
  Ok(HttpResponse::Ok().json(json!({
    "productId": product_id,
    "isFavorite": done.is_favorite.unwrap_or(false),
    "count": app_state.market.favorites_count(&buyer.buyer_id),
    "notices": done.notices,
  })))
}
