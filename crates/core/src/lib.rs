//! Core types, errors, and configuration for chatlens.
//!
//! This crate provides the message table model, the shared error type, and
//! the TOML-backed configuration consumed by the analysis, rendering, and
//! CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::{ChatlensConfig, FrameShape, RenderConfig};
pub use error::{Error, Result};
pub use types::*;
