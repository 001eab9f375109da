// kiln-market/src/web/extractors.rs

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const BUYER_HEADER: &str = "X-Buyer-ID";

/// The buyer a request acts for: the `X-Buyer-ID` header when present,
/// otherwise the session's current buyer. The buyer must exist.
#[derive(Debug, Clone)]
pub struct CurrentBuyer {
  pub buyer_id: String,
}

fn resolve(req: &HttpRequest) -> Result<CurrentBuyer, AppError> {
  let app_state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let from_header = req
    .headers()
    .get(BUYER_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string);

  let buyer_id = match from_header {
    Some(id) => id,
    None => app_state.market.current_buyer().ok_or_else(|| {
      warn!("CurrentBuyer extractor: no header and no buyer in the session.");
      AppError::NotFound("No buyer selected.".to_string())
    })?,
  };

  let buyer = app_state.market.buyer(&buyer_id)?;
  Ok(CurrentBuyer { buyer_id: buyer.id })
}

impl FromRequest for CurrentBuyer {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(resolve(req))
  }
}
