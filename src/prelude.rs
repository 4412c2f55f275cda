//! # Slotscape Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use slotscape::prelude::*;
//!
//! let slots = scan(&NodeCollection::new());
//! let placed = compose(&[PlacementDescriptor::new("assets/helmet.gltf", 2.0, false)], &slots);
//! assert!(placed.is_empty());
//! ```

// Application
pub use crate::app::ShowcaseApp;
pub use crate::config::ShowcaseConfig;
pub use crate::stage::{Phase, Stage};

// Assets
pub use crate::assets::{
    AssetCache, AssetError, AssetProvider, FileAssetProvider, LoadStrategy, LoadedAsset,
    NodeCollection, SceneNode,
};

// Slot discovery and composition
pub use crate::composition::{
    compose, scan, Composer, PlacedInstance, PlacementDescriptor, PlacementRegistry, Presentation,
    Slot, SlotScanner,
};

// Motion
pub use crate::animation::{FloatMotion, FloatSettings, HeroSway, Motion};

// Graphics
pub use crate::gfx::scene::Scene;
pub use crate::gfx::camera::CameraManager;

// Re-export common external dependencies
pub use cgmath::Vector3;
