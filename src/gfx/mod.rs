//! # Graphics Module
//!
//! Everything that touches the GPU: camera, environment, forward renderer,
//! scene objects and their resources.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit camera with mouse and keyboard controls
//! - **Environment** ([`environment`]) - Backdrop colour and lighting terms
//! - **Rendering Pipeline** ([`rendering`]) - Forward pass plus UI overlay hook
//! - **Scene Management** ([`scene`]) - Objects built from loaded assets
//! - **Resource Management** ([`resources`]) - Global uniforms and depth buffer
//!
//! ## Usage
//!
//! ```no_run
//! use slotscape::gfx::{RenderEngine, scene::Scene};
//!
//! // The render engine is created by the showcase app once a window exists
//! // let render_engine = RenderEngine::new(window, width, height).await?;
//! ```

pub mod camera;
pub mod environment;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use environment::Environment;
pub use rendering::render_engine::RenderEngine;
