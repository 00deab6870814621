//! Chart rendering for chatlens.
//!
//! Draws the radar grid, the hourly activity clock, and word clouds as SVG
//! through plotters. Every renderer receives an explicit
//! [`RenderConfig`](chatlens_core::RenderConfig); nothing is kept in global state.

#![deny(missing_docs, unsafe_code)]

/// Radar and polar geometry.
pub mod geometry;

/// Colour parsing and colormaps.
pub mod color;

/// Radar chart grid.
pub mod radar;

/// Hourly activity polar chart.
pub mod clock;

/// Word cloud layout and drawing.
pub mod cloud;

/// Renderer traits and the SVG implementation.
pub mod renderer;

/// Error types for rendering.
pub mod error;

pub use error::{RenderError, RenderResult};
pub use renderer::{ChartRenderer, RadarPanel, SvgRenderer, WordCloudRenderer};
