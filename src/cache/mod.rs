//! Cache Module
//!
//! The instrumented cache facade: value storage under generated keys, typed
//! reads, and call counting with replayable histories.

pub mod decode;
mod facade;
mod recorder;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use decode::DecodeError;
pub use facade::{Cache, STORE_OPERATION};
pub use recorder::{inputs_key, outputs_key, CallHistory, CallRecord, Instrumented, InvocationRecorder};
pub use value::Value;
