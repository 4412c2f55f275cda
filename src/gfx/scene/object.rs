use cgmath::{Matrix4, SquareMatrix, Vector3};
use wgpu::Device;

use super::{scene::ObjectId, vertex::Vertex3D};
use crate::assets::{CpuMesh, LoadedAsset};

pub struct Mesh {
    pub name: String,
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            index_count: indices.len() as u32,
            vertex_count: vertices.len() as u32,
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn from_cpu(mesh: &CpuMesh) -> Self {
        Self::new(mesh.name.clone(), mesh.vertices.clone(), mesh.indices.clone())
    }

    fn upload(&mut self, device: &Device) {
        use wgpu::util::DeviceExt;

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex Buffer: {}", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index Buffer: {}", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }
}

/// Per-object uniform: the model matrix
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for ObjectUniform {
    fn from(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

pub struct Object {
    /// Assigned by [`Scene::add_object`](super::scene::Scene::add_object)
    pub id: ObjectId,
    pub name: String,
    /// Identifier of the asset the meshes came from
    pub source: String,
    pub meshes: Vec<Mesh>,
    pub transform: Matrix4<f32>, // cgmath 4x4 transformation matrix
    pub visible: bool,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
    transform_dirty: bool,
}

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            source: String::new(),
            meshes,
            transform: Matrix4::identity(),
            visible: true,
            gpu_resources: None,
            transform_dirty: true,
        }
    }

    /// Creates an object holding every mesh of a loaded asset
    pub fn from_asset(name: impl Into<String>, asset: &LoadedAsset) -> Self {
        let meshes = asset.meshes.iter().map(Mesh::from_cpu).collect();
        let mut object = Self::new(name, meshes);
        object.source = asset.id.clone();
        object
    }

    /// Replaces the whole transform
    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        if self.transform != transform {
            self.transform = transform;
            self.transform_dirty = true;
        }
    }

    /// Create a complete transform from translation and uniform scale
    pub fn set_translation_scale(&mut self, translation: Vector3<f32>, scale: f32) {
        self.set_transform(Matrix4::from_translation(translation) * Matrix4::from_scale(scale));
    }

    pub fn vertex_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.vertex_count).sum()
    }

    pub fn triangle_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.index_count / 3).sum()
    }

    /// Writes the transform to the GPU if it changed since the last sync
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        if !self.transform_dirty {
            return;
        }
        if let Some(gpu_resources) = &self.gpu_resources {
            let uniform = ObjectUniform::from(self.transform);
            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::bytes_of(&uniform),
            );
            self.transform_dirty = false;
        }
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        use wgpu::util::DeviceExt;

        for mesh in self.meshes.iter_mut() {
            mesh.upload(device);
        }

        let uniform = ObjectUniform::from(self.transform);
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Transform Uniform Buffer: {}", self.name)),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
        self.transform_dirty = false;

        log::debug!(
            "Uploaded '{}': {} meshes, {} triangles",
            self.name,
            self.meshes.len(),
            self.triangle_count()
        );
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn draw_object(&mut self, object: &'b Object) {
        let Some(bind_group) = object.get_transform_bind_group() else {
            return;
        };
        self.set_bind_group(1, bind_group, &[]);
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CpuMesh {
        let v = |x: f32| Vertex3D {
            position: [x, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            color: [1.0, 1.0, 1.0],
        };
        CpuMesh {
            name: "tri".to_string(),
            vertices: vec![v(0.0), v(1.0), v(2.0)],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_object_from_asset() {
        let asset = LoadedAsset {
            id: "assets/tri.glb".to_string(),
            meshes: vec![triangle(), triangle()],
            ..Default::default()
        };
        let object = Object::from_asset("tri", &asset);

        assert_eq!(object.source, "assets/tri.glb");
        assert_eq!(object.triangle_count(), 2);
        assert_eq!(object.vertex_count(), 6);
        assert!(object.gpu_resources.is_none());
        assert!(!object.meshes[0].is_uploaded());
    }

    #[test]
    fn test_translation_scale_transform() {
        let mut object = Object::new("empty", Vec::new());
        object.set_translation_scale(Vector3::new(5.0, 1.0, 0.0), 2.0);

        let origin = object.transform * cgmath::Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, cgmath::Vector4::new(7.0, 1.0, 0.0, 1.0));
    }
}
