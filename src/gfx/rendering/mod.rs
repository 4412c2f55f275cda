// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! A single forward pipeline draws every scene object with one directional
//! key light and a flat ambient term.

pub mod render_engine;

// Re-export main types
pub use render_engine::RenderEngine;
