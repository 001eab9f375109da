// kiln-market/src/web/handlers/session_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::Notice;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SwitchBuyerPayload {
  pub buyer_id: String,
}

#[instrument(name = "handler::get_session", skip(app_state))]
pub async fn get_session_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let buyer = match app_state.market.current_buyer() {
    Some(id) => Some(app_state.market.buyer(&id)?),
    None => None,
  };
  Ok(HttpResponse::Ok().json(json!({ "currentBuyer": buyer })))
}

#[instrument(name = "handler::switch_buyer", skip(app_state, req_payload), fields(buyer_id = %req_payload.buyer_id))]
pub async fn switch_buyer_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SwitchBuyerPayload>,
) -> Result<HttpResponse, AppError> {
  let buyer = app_state.market.switch_buyer(req_payload.buyer_id.trim())?;
  info!("Now browsing as {}.", buyer.name);
  let notice = Notice::info("Profile Switched", format!("You are now browsing as {}", buyer.name));
  Ok(HttpResponse::Ok().json(json!({
    "currentBuyer": buyer,
    "notices": [notice],
  })))
}
