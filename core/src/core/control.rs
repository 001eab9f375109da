// kiln-flow/src/core/control.rs

//! Flow control signals and the outcome of a whole run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Run the remaining handlers and steps.
  Continue,
  /// Halt the flow now. Not an error: the run reports [`FlowOutcome::Stopped`].
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step that was not skipped ran to completion.
  Completed,
  /// A handler returned [`StepControl::Stop`].
  Stopped,
}
