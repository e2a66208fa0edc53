#![warn(clippy::all, rust_2018_idioms)]

//! Minimal plotting library rendering line and marker plots to SVG markup.

mod plotting;
pub mod svg;

pub use plotting::{Axis, Dash, Figure, LegendAnchor, LinePlot, MarkerShape, Ticks};
