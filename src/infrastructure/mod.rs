//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the cpal
//! recording engine and the XDG config store.

pub mod config;
pub mod engine;

// Re-export adapters
pub use config::XdgConfigStore;
pub use engine::{create_engine, CpalEngine};
