// kiln-flow/src/lib.rs

//! Kiln Flow: small async engine for the marketplace's multi-step operations.
//!
//! A [`Flow`] is an ordered list of named steps. Each step may carry `before`,
//! `on` and `after` handlers, all operating on one shared [`FlowContext`].
//! Handlers return [`StepControl::Continue`] to keep going or
//! [`StepControl::Stop`] to halt the flow without an error.
//!
//! Flows are registered in a [`FlowRegistry`] keyed by their context type, so a
//! caller only needs to build the context and hand it to [`FlowRegistry::run`].
//!
//! ```ignore
//! let mut flow = Flow::<AddCtx, AppError>::new(&[("validate", false, None), ("apply", false, None)]);
//! flow.on("validate", |ctx: FlowContext<AddCtx>| Box::pin(async move { ... }));
//! registry.register(flow);
//! registry.run(FlowContext::new(ctx)).await?;
//! ```

pub mod core;
pub mod error;
pub mod flow;
pub mod registry;

pub use crate::core::context::FlowContext;
pub use crate::core::control::{FlowOutcome, StepControl};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, Step};

pub use crate::flow::Flow;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;
