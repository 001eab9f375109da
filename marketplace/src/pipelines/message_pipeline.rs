// kiln-market/src/pipelines/message_pipeline.rs

use crate::errors::AppError;
use crate::models::Notice;
use crate::pipelines::common_steps::resolve_buyer;
use crate::pipelines::contexts::SendMessageCtxData;
use kiln_flow::{Flow, FlowContext, FlowRegistry, StepControl};
use tracing::{info, warn};

/// Longest message body accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub fn register_send_message_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<SendMessageCtxData, AppError>::new(&[
    ("resolve_buyer", false, None),
    ("validate_content", false, None),
    ("deliver", false, None),
  ]);

  f.on("resolve_buyer", resolve_buyer::<SendMessageCtxData>);

  f.on("validate_content", |ctx: FlowContext<SendMessageCtxData>| async move {
    let mut guard = ctx.write();
    let trimmed = guard.content.trim().to_string();
    if trimmed.is_empty() {
      warn!(seller_id = %guard.seller_id, "Empty message rejected.");
      return Err(AppError::Validation("Message content cannot be empty.".to_string()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
      return Err(AppError::Validation(format!(
        "Messages are limited to {} characters.",
        MAX_MESSAGE_CHARS
      )));
    }
    guard.content = trimmed;
    Ok(StepControl::Continue)
  });

  f.on("deliver", |ctx: FlowContext<SendMessageCtxData>| async move {
    let sent = {
      let guard = ctx.read();
      guard
        .app_state
        .market
        .send_message(&guard.buyer_id, &guard.seller_id, &guard.content)?
    };
    info!(message_id = %sent.id, seller_id = %sent.seller_id, "Message sent.");
    let mut guard = ctx.write();
    guard.sent = Some(sent);
    guard
      .notices
      .push(Notice::info("Message Sent", "Your message has been sent to the seller."));
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Send message flow registered.");
}
