// src/lib.rs
//! Slotscape
//!
//! A 3D showcase built on wgpu and winit. A base scene is scanned for nodes
//! whose name marks them as slots, and a configured list of models is placed
//! onto those slots, some of them floating in place.

pub mod animation;
pub mod app;
pub mod assets;
pub mod composition;
pub mod config;
pub mod gfx;
pub mod prelude;
pub mod stage;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ShowcaseApp;
pub use config::ShowcaseConfig;
