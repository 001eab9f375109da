// kiln-flow/src/core/handler.rs

use crate::core::context::FlowContext;
use crate::core::control::StepControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed async step handler.
///
/// Handlers receive their own clone of the run's [`FlowContext`], lock it to
/// read or write state, and must release the guard before awaiting.
pub type Handler<T, Err> =
  Box<dyn Fn(FlowContext<T>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>> + Send + Sync>;
