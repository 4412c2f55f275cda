//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the showcase.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`showcase_panel`] - stage status, placements and scene objects
//! - [`annotation_overlay`] - the hero model's annotation
//!
//! ## Input Handling
//!
//! When the overlay wants the mouse or keyboard, camera controls are skipped
//! for that event.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{annotation_overlay, showcase_panel};
