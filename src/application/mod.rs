//! Application layer - Recorder facade and port interfaces
//!
//! Contains the recorder facade that drives an engine, and the trait
//! definitions for engines and config storage.

pub mod ports;
pub mod recorder;

// Re-export the facade
pub use recorder::{EventListener, Recorder, RecorderEvent, RecorderOptions, SubscriptionId};
