// kiln-flow/src/core/step.rs

use super::FlowContext;
use std::sync::Arc;

/// Evaluated before a step runs; returning `true` skips the step.
pub type SkipCondition<T> = Arc<dyn Fn(FlowContext<T>) -> bool + Send + Sync + 'static>;

/// One named step of a flow.
#[derive(Clone)]
pub struct Step<T: 'static + Send + Sync> {
  pub name: String,
  /// Optional steps may have no handlers; required ones fail the run instead.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> std::fmt::Debug for Step<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Step")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
