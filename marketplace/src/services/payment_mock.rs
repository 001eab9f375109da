// kiln-market/src/services/payment_mock.rs

//! Stand-in card processor. Card number `4000000000000002` is always declined.

use crate::errors::{AppError, Result as AppResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const DECLINED_TEST_CARD: &str = "4000000000000002";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  RequiresConfirmation,
  Succeeded,
  Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockPaymentIntent {
  pub id: String,
  pub order_id: Uuid,
  pub amount_cents: u64,
  pub currency: String,
  pub status: PaymentStatus,
}

fn to_cents(amount: Decimal) -> AppResult<u64> {
  amount
    .checked_mul(Decimal::ONE_HUNDRED)
    .map(|cents| cents.round())
    .and_then(|cents| cents.to_u64())
    .ok_or_else(|| AppError::Payment(format!("Amount {} cannot be charged", amount)))
}

#[instrument(skip_all, fields(%order_id, %amount, currency))]
pub async fn create_mock_payment_intent(order_id: Uuid, amount: Decimal, currency: &str) -> AppResult<MockPaymentIntent> {
  let amount_cents = to_cents(amount)?;
  if amount_cents == 0 {
    return Err(AppError::Payment("Amount must be greater than zero".to_string()));
  }

  let intent = MockPaymentIntent {
    id: format!("mock_pi_{}", Uuid::new_v4()),
    order_id,
    amount_cents,
    currency: currency.to_string(),
    status: PaymentStatus::RequiresConfirmation,
  };
  info!(payment_intent_id = %intent.id, "Payment intent created.");
  Ok(intent)
}

/// Confirms `intent` against the card after `processing` of simulated latency.
#[instrument(skip_all, fields(payment_intent_id = %intent.id))]
pub async fn confirm_mock_payment(intent: &mut MockPaymentIntent, card_number: &str, processing: Duration) -> AppResult<()> {
  tokio::time::sleep(processing).await;

  let digits: String = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
  if digits == DECLINED_TEST_CARD {
    intent.status = PaymentStatus::Failed;
    warn!("Mock payment declined.");
    return Err(AppError::Payment("Your card was declined.".to_string()));
  }

  intent.status = PaymentStatus::Succeeded;
  info!(amount_cents = intent.amount_cents, "Mock payment succeeded.");
  Ok(())
}
