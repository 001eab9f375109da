// kiln-market/src/web/handlers/message_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::run_flow;
use crate::errors::AppError;
use crate::pipelines::contexts::SendMessageCtxData;
use crate::state::AppState;
use crate::web::extractors::CurrentBuyer;

#[derive(Deserialize, Debug)]
pub struct SendMessagePayload {
  pub content: String,
}

#[instrument(name = "handler::inbox", skip(app_state, buyer), fields(buyer_id = %buyer.buyer_id))]
pub async fn inbox_handler(app_state: web::Data<AppState>, buyer: CurrentBuyer) -> Result<HttpResponse, AppError> {
  let inbox = app_state.market.inbox(&buyer.buyer_id)?;
  Ok(HttpResponse::Ok().json(inbox))
}

#[instrument(
  name = "handler::conversation",
  skip(app_state, path, buyer),
  fields(buyer_id = %buyer.buyer_id, seller_id = %path.as_ref())
)]
pub async fn conversation_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();
  let messages = app_state.market.conversation(&buyer.buyer_id, &seller_id)?;
  debug!(count = messages.len(), "Conversation loaded.");
  Ok(HttpResponse::Ok().json(json!({
    "sellerId": seller_id,
    "messages": messages,
  })))
}

#[instrument(
  name = "handler::send_message",
  skip(app_state, path, req_payload, buyer),
  fields(buyer_id = %buyer.buyer_id, seller_id = %path.as_ref())
)]
pub async fn send_message_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<SendMessagePayload>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();
  let ctx = SendMessageCtxData::new(
    app_state.get_ref().clone(),
    &buyer.buyer_id,
    &seller_id,
    &req_payload.content,
  );
  let done = run_flow(&app_state, ctx).await?;
  Ok(HttpResponse::Created().json(json!({
    "message": done.sent,
    "notices": done.notices,
  })))
}

#[instrument(
  name = "handler::mark_conversation_read",
  skip(app_state, path, buyer),
  fields(buyer_id = %buyer.buyer_id, seller_id = %path.as_ref())
)]
pub async fn mark_read_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  buyer: CurrentBuyer,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();
  let marked = app_state.market.mark_conversation_read(&buyer.buyer_id, &seller_id)?;
  let unread_count = app_state.market.inbox(&buyer.buyer_id)?.unread_count;
  Ok(HttpResponse::Ok().json(json!({
    "marked": marked,
    "unreadCount": unread_count,
  })))
}
