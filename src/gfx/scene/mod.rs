//! # Scene Management Module
//!
//! Objects, meshes and vertex data for the showcase scene.
//!
//! ## Key Components
//!
//! - [`Scene`] - Container for objects, camera and environment
//! - [`Object`] - One drawable built from a loaded asset, with a model transform
//! - [`Vertex3D`] - Position, normal and colour vertex
//!
//! Objects are created CPU-side (see [`Object::from_asset`]) and receive their
//! GPU buffers lazily through [`Scene::init_gpu_resources`].

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, Mesh, Object};
pub use scene::{ObjectId, Scene, SceneStatistics};
pub use vertex::Vertex3D;
