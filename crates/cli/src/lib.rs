//! Command-line interface for chatlens.
//!
//! This crate wires the analysis steps to subcommands, applies configuration
//! overrides, and sets up logging.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
