//! glTF / GLB loading through the `gltf` crate.
//!
//! Walks the default scene depth-first (pre-order), recording every named node
//! into the asset's [`NodeCollection`] and baking each mesh primitive into asset
//! space with its node's world transform.

use std::path::Path;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};
use gltf::mesh::util::ReadIndices;

use super::{AssetError, CpuMesh, LoadedAsset, SceneNode};
use crate::gfx::scene::vertex::Vertex3D;

/// Colour used when a primitive has no material
const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Loads a `.gltf` or `.glb` file
pub fn load_gltf(id: &str, path: &Path) -> Result<LoadedAsset, AssetError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|source| match source {
        gltf::Error::Io(source) => AssetError::Io {
            id: id.to_string(),
            source,
        },
        source => AssetError::Gltf {
            id: id.to_string(),
            source,
        },
    })?;

    let mut asset = LoadedAsset {
        id: id.to_string(),
        ..Default::default()
    };

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());

    match scene {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, Matrix4::identity(), &buffers, &mut asset);
            }
        }
        None => log::warn!("glTF asset '{}' has no scenes", id),
    }

    log::debug!(
        "Loaded glTF '{}': {} named nodes, {} meshes, {} vertices",
        id,
        asset.nodes.len(),
        asset.meshes.len(),
        asset.vertex_count()
    );

    Ok(asset)
}

fn visit_node(
    node: &gltf::Node,
    parent_world: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    asset: &mut LoadedAsset,
) {
    let local = Matrix4::from(node.transform().matrix());
    let world = parent_world * local;

    if let Some(name) = node.name() {
        let (translation, _rotation, _scale) = node.transform().decomposed();
        asset
            .nodes
            .insert(SceneNode::new(name, Vector3::from(translation)));
    }

    if let Some(mesh) = node.mesh() {
        if let Some(cpu_mesh) = bake_mesh(node, &mesh, world, buffers) {
            asset.meshes.push(cpu_mesh);
        }
    }

    for child in node.children() {
        visit_node(&child, world, buffers, asset);
    }
}

fn bake_mesh(
    node: &gltf::Node,
    mesh: &gltf::Mesh,
    world: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
) -> Option<CpuMesh> {
    let normal_matrix = normal_matrix(world);
    let mut vertices: Vec<Vertex3D> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::trace!("Skipping non-triangle primitive in mesh {:?}", mesh.name());
            continue;
        }

        let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(it) => it.collect(),
            None => vec![[0.0, 1.0, 0.0]; positions.len()],
        };

        let base_color = primitive.material().pbr_metallic_roughness().base_color_factor();
        let color = if primitive.material().index().is_some() {
            [base_color[0], base_color[1], base_color[2]]
        } else {
            DEFAULT_COLOR
        };

        let start = vertices.len() as u32;
        for (position, normal) in positions.iter().zip(normals.iter()) {
            let p = world * Vector4::new(position[0], position[1], position[2], 1.0);
            let n = (normal_matrix * Vector3::from(*normal)).normalize();
            vertices.push(Vertex3D {
                position: [p.x, p.y, p.z],
                normal: [n.x, n.y, n.z],
                color,
            });
        }

        let primitive_indices: Vec<u32> = match reader.read_indices() {
            Some(ReadIndices::U8(it)) => it.map(u32::from).collect(),
            Some(ReadIndices::U16(it)) => it.map(u32::from).collect(),
            Some(ReadIndices::U32(it)) => it.collect(),
            None => (0..positions.len() as u32).collect(),
        };
        indices.extend(primitive_indices.into_iter().map(|i| start + i));
    }

    if vertices.is_empty() || indices.is_empty() {
        return None;
    }

    let name = node
        .name()
        .or_else(|| mesh.name())
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

    Some(CpuMesh {
        name,
        vertices,
        indices,
    })
}

/// Inverse-transpose of the upper 3x3, falling back to the plain 3x3 for
/// singular transforms
fn normal_matrix(world: Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    linear
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_matrix_of_uniform_scale_keeps_direction() {
        let world = Matrix4::from_scale(3.0);
        let n = (normal_matrix(world) * Vector3::new(0.0, 1.0, 0.0)).normalize();
        assert!((n - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_gltf("missing.glb", Path::new("definitely/not/here.glb")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
