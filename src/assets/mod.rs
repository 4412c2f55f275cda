//! # Asset Module
//!
//! CPU-side scene assets for the showcase. An asset is identified by a plain
//! string (a path relative to the working directory, e.g. `assets/scene.glb`)
//! and loads into a [`LoadedAsset`]: the named node collection used for slot
//! discovery plus the merged geometry the renderer uploads.
//!
//! ## Key Components
//!
//! - [`AssetProvider`] - Loads an identifier into a [`LoadedAsset`]
//! - [`FileAssetProvider`] - Reads glTF/GLB (via `gltf`) and OBJ (via `tobj`) files
//! - [`AssetCache`] - Caches loaded assets by identifier and loads in the background
//! - [`NodeCollection`] - Name-keyed, insertion-ordered scene nodes
//!
//! Formats are decoded by the `gltf` and `tobj` crates. Only positions, normals,
//! indices and base colour factors are kept; textures are ignored.

pub mod cache;
pub mod gltf_loader;
pub mod obj_loader;

use std::{collections::HashMap, path::Path};

use cgmath::Vector3;
use thiserror::Error;

use crate::gfx::scene::vertex::Vertex3D;

pub use cache::{AssetCache, AssetRequest, LoadOutcome, LoadStrategy};

/// Errors raised while resolving an asset identifier
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset '{id}'")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to import glTF asset '{id}'")]
    Gltf {
        id: String,
        #[source]
        source: gltf::Error,
    },

    #[error("failed to load OBJ asset '{id}'")]
    Obj {
        id: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("unsupported asset format for '{0}' (expected .gltf, .glb or .obj)")]
    UnsupportedFormat(String),

    #[error("asset loader for '{0}' stopped before delivering a result")]
    ProviderGone(String),
}

/// A named node of a loaded scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Local translation of the node
    pub position: Vector3<f32>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, position: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Named nodes of an asset, keyed by name and iterated in insertion order.
///
/// Names are kept unique the way scene loaders do it: a name that is already
/// taken is stored as `name_1`, `name_2` and so on, so repeated names never
/// hide a node. Unnamed nodes are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCollection {
    nodes: Vec<SceneNode>,
    index: HashMap<String, usize>,
    /// Suffixes handed out per requested name
    repeats: HashMap<String, usize>,
}

impl NodeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, returning the name it was stored under.
    ///
    /// Returns `None` when the node was dropped for having no name.
    pub fn insert(&mut self, mut node: SceneNode) -> Option<&str> {
        if node.name.is_empty() {
            return None;
        }

        if self.index.contains_key(&node.name) {
            let unique = self.unique_name(&node.name);
            log::trace!("Node name '{}' repeated, stored as '{}'", node.name, unique);
            node.name = unique;
        }

        let position = self.nodes.len();
        self.index.insert(node.name.clone(), position);
        self.nodes.push(node);
        self.nodes.last().map(|node| node.name.as_str())
    }

    fn unique_name(&mut self, name: &str) -> String {
        let counter = self.repeats.entry(name.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}_{}", name, counter);
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SceneNode> {
        self.index.get(name).and_then(|&i| self.nodes.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<SceneNode> for NodeCollection {
    fn from_iter<I: IntoIterator<Item = SceneNode>>(iter: I) -> Self {
        let mut collection = NodeCollection::new();
        for node in iter {
            collection.insert(node);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a NodeCollection {
    type Item = &'a SceneNode;
    type IntoIter = std::slice::Iter<'a, SceneNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// CPU-side mesh ready to be uploaded to the GPU
#[derive(Debug, Clone, Default)]
pub struct CpuMesh {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl CpuMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A fully loaded asset: scene nodes plus geometry in asset space
#[derive(Debug, Clone, Default)]
pub struct LoadedAsset {
    pub id: String,
    pub nodes: NodeCollection,
    pub meshes: Vec<CpuMesh>,
}

impl LoadedAsset {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }
}

/// Resolves asset identifiers into loaded scene graphs
///
/// Implementations must be shareable across the loader threads spawned by
/// [`AssetCache`].
pub trait AssetProvider: Send + Sync {
    fn load(&self, id: &str) -> Result<LoadedAsset, AssetError>;
}

/// Loads assets from the filesystem, choosing a decoder by file extension
#[derive(Debug, Clone, Default)]
pub struct FileAssetProvider;

impl FileAssetProvider {
    pub fn new() -> Self {
        Self
    }
}

impl AssetProvider for FileAssetProvider {
    fn load(&self, id: &str) -> Result<LoadedAsset, AssetError> {
        let path = Path::new(id);
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("gltf") | Some("glb") => gltf_loader::load_gltf(id, path),
            Some("obj") => obj_loader::load_obj(id, path),
            _ => Err(AssetError::UnsupportedFormat(id.to_string())),
        }
    }
}
