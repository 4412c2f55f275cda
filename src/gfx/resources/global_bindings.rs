//! Global uniform bindings for camera and lighting data
//!
//! Manages the uniform buffer and bind group shared by every draw call in a
//! frame. Bound to group 0 of the forward pipeline.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, environment::Environment},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],  // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4], // Camera view-projection matrix
    light_position: [f32; 3],
    ambient: f32,
    light_color: [f32; 3],
    light_intensity: f32,
}
// Total: 16 + 64 + 12 + 4 + 12 + 4 = 112 bytes

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, environment: &Environment) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_position: environment.light.position,
            ambient: environment.ambient,
            light_color: environment.light.color,
            light_intensity: environment.light.intensity,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with this frame's camera and environment
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    environment: &Environment,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, environment));
}

/// Manages bind group layouts and bind groups for global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout; the bind group itself is made by `create_bind_group()`
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // camera + light
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Returns the bind group for rendering, if it has been created
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_size_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 112);
    }
}
