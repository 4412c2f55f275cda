use wgpu::Device;

use crate::gfx::{camera::camera_utils::CameraManager, environment::Environment};

use super::object::Object;

/// Stable handle of an object inside a [`Scene`]; never reused after removal
pub type ObjectId = usize;

/// Main scene containing objects, camera and environment
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub environment: Environment,
    next_id: ObjectId,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager, environment: Environment) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            environment,
            next_id: 0,
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Adds an object and returns its id
    pub fn add_object(&mut self, mut object: Object) -> ObjectId {
        object.name = self.ensure_unique_name(&object.name);
        let id = self.next_id;
        self.next_id += 1;
        object.id = id;
        self.objects.push(object);
        id
    }

    /// Removes an object, dropping its GPU buffers
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let index = self.objects.iter().position(|obj| obj.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Creates GPU resources for every object that does not have them yet.
    ///
    /// Objects can arrive at any frame (assets load in the background), so this
    /// is cheap to call every frame.
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        for object in self.objects.iter_mut() {
            if object.gpu_resources.is_none() {
                object.init_gpu_resources(device, layout);
            }
        }
    }

    /// Syncs changed object transforms to the GPU
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.update_transform(queue);
        }
    }

    /// Gets all object names for UI display
    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|obj| obj.id == id)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            total_triangles: self.objects.iter().map(Object::triangle_count).sum(),
            total_vertices: self.objects.iter().map(Object::vertex_count).sum(),
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, EnvironmentConfig};

    fn scene() -> Scene {
        Scene::new(
            CameraManager::from_config(&CameraConfig::default(), 1.0),
            Environment::from(EnvironmentConfig::default()),
        )
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let mut scene = scene();
        let a = scene.add_object(Object::new("helmet", Vec::new()));
        let b = scene.add_object(Object::new("helmet", Vec::new()));
        let c = scene.add_object(Object::new("helmet", Vec::new()));

        assert_eq!(scene.get_object(a).unwrap().name, "helmet");
        assert_eq!(scene.get_object(b).unwrap().name, "helmet (1)");
        assert_eq!(scene.get_object(c).unwrap().name, "helmet (2)");
    }

    #[test]
    fn test_removal_keeps_other_ids_valid() {
        let mut scene = scene();
        let a = scene.add_object(Object::new("a", Vec::new()));
        let b = scene.add_object(Object::new("b", Vec::new()));
        let c = scene.add_object(Object::new("c", Vec::new()));

        assert_eq!(scene.remove_object(b).map(|obj| obj.name), Some("b".to_string()));
        assert!(scene.get_object(b).is_none());
        assert!(scene.remove_object(b).is_none());
        assert_eq!(scene.get_object(a).unwrap().name, "a");
        assert_eq!(scene.get_object(c).unwrap().name, "c");

        let d = scene.add_object(Object::new("d", Vec::new()));
        assert_ne!(d, b);
        assert_eq!(scene.get_object_count(), 3);
    }

    #[test]
    fn test_empty_statistics() {
        let scene = scene();
        assert_eq!(
            scene.get_statistics(),
            SceneStatistics {
                object_count: 0,
                total_triangles: 0,
                total_vertices: 0,
            }
        );
    }
}
