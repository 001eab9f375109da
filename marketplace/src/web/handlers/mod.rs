// kiln-market/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod catalog_handlers;
pub mod checkout_handlers;
pub mod favorites_handlers;
pub mod message_handlers;
pub mod seller_handlers;
pub mod session_handlers;

use crate::errors::AppError;
use crate::state::AppState;
use kiln_flow::{FlowContext, FlowOutcome};
use tracing::warn;

/// Runs the flow registered for `T` and hands back the final context data.
/// A flow that stops early is an error for an HTTP request.
pub(crate) async fn run_flow<T>(app_state: &AppState, data: T) -> Result<T, AppError>
where
  T: Clone + Send + Sync + 'static,
{
  let ctx = FlowContext::new(data);
  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => Ok(ctx.snapshot()),
    FlowOutcome::Stopped => {
      warn!(context_type = std::any::type_name::<T>(), "Flow was stopped by a handler.");
      Err(AppError::FlowHalted)
    }
  }
}
