//! Wavefront OBJ loading through `tobj`.
//!
//! OBJ has no node hierarchy, so every named model (`o`/`g` statement) becomes
//! one scene node positioned at the centre of its bounding box. Geometry is
//! already in asset space.

use std::path::Path;

use cgmath::{InnerSpace, Vector3};

use super::{AssetError, CpuMesh, LoadedAsset, SceneNode};
use crate::gfx::scene::vertex::Vertex3D;

const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Loads an `.obj` file, with colours from its MTL library when present
pub fn load_obj(id: &str, path: &Path) -> Result<LoadedAsset, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| match source {
        tobj::LoadError::OpenFileFailed => AssetError::Io {
            id: id.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string()),
        },
        source => AssetError::Obj {
            id: id.to_string(),
            source,
        },
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::debug!("No MTL library for '{}' ({}), using default colours", id, err);
        Vec::new()
    });

    let mut asset = LoadedAsset {
        id: id.to_string(),
        ..Default::default()
    };

    for model in models.iter() {
        let mesh = &model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        if let Some(center) = bounds_center(&mesh.positions) {
            asset.nodes.insert(SceneNode::new(model.name.clone(), center));
        }

        let color = mesh
            .material_id
            .and_then(|material_id| materials.get(material_id))
            .and_then(|material| material.diffuse)
            .unwrap_or(DEFAULT_COLOR);

        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            calculate_vertex_normals(&mesh.positions, &mesh.indices)
        };

        let vertices = mesh
            .positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
                color,
            })
            .collect();

        asset.meshes.push(CpuMesh {
            name: model.name.clone(),
            vertices,
            indices: mesh.indices.clone(),
        });
    }

    log::debug!(
        "Loaded OBJ '{}': {} named nodes, {} meshes",
        id,
        asset.nodes.len(),
        asset.meshes.len()
    );

    Ok(asset)
}

fn bounds_center(positions: &[f32]) -> Option<Vector3<f32>> {
    let mut points = positions
        .chunks_exact(3)
        .map(|p| Vector3::new(p[0], p[1], p[2]));
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(min, max), p| {
        (
            Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
            Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
        )
    });
    Some((min + max) * 0.5)
}

/// Averages face normals onto vertices for meshes exported without normals
pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); vertex_count];
    let point = |i: usize| Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);

    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }
        let face_normal = (point(i1) - point(i0)).cross(point(i2) - point(i0));
        for i in [i0, i1, i2] {
            accumulated[i] += face_normal;
        }
    }

    accumulated
        .into_iter()
        .flat_map(|n| {
            let n = if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                Vector3::unit_y()
            };
            [n.x, n.y, n.z]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_center() {
        let positions = [0.0, 0.0, 0.0, 2.0, 4.0, -2.0];
        assert_eq!(bounds_center(&positions), Some(Vector3::new(1.0, 2.0, -1.0)));
        assert_eq!(bounds_center(&[]), None);
    }

    #[test]
    fn test_flat_triangle_normals_point_up() {
        // Counter-clockwise when seen from +Y
        let positions = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let normals = calculate_vertex_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals.len(), 9);
        for n in normals.chunks_exact(3) {
            assert!((n[1] - 1.0).abs() < 1e-6);
        }
    }
}
