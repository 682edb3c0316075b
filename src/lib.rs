//! Collision-aware planet labels for 2-D star system maps.
//!
//! [`label::PlanetLabel`] is the heart of the crate: it picks a heading for
//! a planet's label that keeps the text clear of neighbouring bodies and
//! replays the label onto any [`canvas::Canvas`]. [`renderer::Renderer`]
//! draws a whole [`body::System`] to SVG, and [`export`] turns that into PNG
//! or PDF.

pub mod body;
pub mod canvas;
pub mod color;
pub mod error;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod label;
pub mod renderer;
pub mod svg;
pub mod system_file;
pub mod theme;

pub use error::{Error, Result};
