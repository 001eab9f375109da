// tests/common/mod.rs
#![allow(dead_code)]

use kiln_flow::{FlowContext, FlowError, StepControl};
use once_cell::sync::Lazy;
use tracing::Level;

/// A tiny stand-in for a cart operation: handlers add units and log their step.
#[derive(Clone, Debug, Default)]
pub struct DraftOrder {
  pub units: i32,
  pub notes: String,
  pub steps_executed: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow framework error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub fn adding_handler(step_name: &'static str, note: &'static str) -> kiln_flow::Handler<DraftOrder, TestError> {
  Box::new(move |ctx: FlowContext<DraftOrder>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.units += 1;
      guard.notes.push_str(note);
      guard.steps_executed.push(step_name.to_string());
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, message: &'static str) -> kiln_flow::Handler<DraftOrder, TestError> {
  Box::new(move |ctx: FlowContext<DraftOrder>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
