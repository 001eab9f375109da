// kiln-flow/src/flow/mod.rs

//! The `Flow<T, Err>` type: construction, handler registration and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Flow;
