//! Core abstractions for the offline shell worker.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - `Request` / `Response` - Host-independent HTTP records
//! - `WorkerConfig` - Versioned cache and precache configuration
//! - `Scope` - Registration scope used to resolve relative assets
//! - `WorkerState` - Worker lifecycle state machine

mod config;
mod context;
mod error;
mod lifecycle;
mod response;

pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
pub use response::*;
