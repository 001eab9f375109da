pub mod context;
pub mod control;
pub mod handler;
pub mod step;

pub use context::FlowContext;
pub use control::{FlowOutcome, StepControl};
pub use handler::Handler;
pub use step::Step;
