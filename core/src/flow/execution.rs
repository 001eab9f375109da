// kiln-flow/src/flow/execution.rs

//! `Flow::run`: walks the steps in order and drives their handlers.

use crate::core::context::FlowContext;
use crate::core::control::{FlowOutcome, StepControl};
use crate::core::handler::Handler;
use crate::error::FlowError;
use crate::flow::definition::Flow;
use tracing::{event, instrument, span, Instrument, Level};

impl<T, Err> Flow<T, Err>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx`.
  ///
  /// A handler error aborts the run and is returned as is. A required step
  /// without any handler fails with [`FlowError::HandlerMissing`].
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<T>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx: FlowContext<T>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step) in self.steps.iter().enumerate() {
      let step_name = step.name.as_str();
      let step_span = span!(
        Level::INFO,
        "flow_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step.optional
      );

      if let Some(skip_if) = &step.skip_if {
        if skip_if(ctx.clone()) {
          event!(parent: &step_span, Level::INFO, "Step skipped by its condition.");
          continue;
        }
      }

      let phases: [(&str, Option<&Vec<Handler<T, Err>>>); 3] = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      if phases.iter().all(|(_, handlers)| handlers.map_or(true, |h| h.is_empty())) {
        if step.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        let Some(handlers) = handlers else { continue };
        for (handler_idx, handler) in handlers.iter().enumerate() {
          let handler_span = span!(parent: &step_span, Level::DEBUG, "handler", phase, handler_index = handler_idx);
          match handler(ctx.clone()).instrument(handler_span).await {
            Ok(StepControl::Continue) => {}
            Ok(StepControl::Stop) => {
              event!(parent: &step_span, Level::INFO, phase, "Flow stopped by a handler.");
              return Ok(FlowOutcome::Stopped);
            }
            Err(e) => {
              event!(parent: &step_span, Level::WARN, phase, error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }
}
