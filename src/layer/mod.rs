//! Tower Layer implementations for A2A protocol

pub mod validation;

pub use validation::{JsonRpcValidationLayer, JsonRpcValidationService};
