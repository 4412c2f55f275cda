use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::CameraConfig;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Camera orbiting a target point, Y up
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: OrbitHome,
}

/// Pose restored by [`OrbitCamera::reset_to_default`]
#[derive(Debug, Clone, Copy)]
struct OrbitHome {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
            home: OrbitHome {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera
    }

    /// Builds a camera from the showcase camera settings
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let target = Vector3::from(config.target);
        let mut camera = Self::new(config.distance, config.pitch, config.yaw, target, aspect);
        camera.fovy = Deg(config.fov_degrees).into();
        let (min_distance, max_distance) =
            distance_bounds(config.min_distance, config.max_distance);
        camera.bounds.min_distance = Some(min_distance);
        camera.bounds.max_distance = Some(max_distance);
        camera.set_distance(camera.distance);
        camera.home.distance = camera.distance;
        camera.update_view_proj();
        camera
    }

    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;

        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        // Bounds set by hand may be out of order, which `clamp` panics on
        self.distance = distance
            .max(self.bounds.min_distance.unwrap_or(f32::EPSILON))
            .min(self.bounds.max_distance.unwrap_or(f32::MAX));
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        // Zoom faster the further out we are
        let corrected_zoom = self.distance.max(1.0).log10().max(0.1) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::PI / 2.0 + 0.01,
            max_pitch: std::f32::consts::PI / 2.0 - 0.01,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

/// Orders the configured zoom range, replacing values that are not usable
fn distance_bounds(min: f32, max: f32) -> (f32, f32) {
    let defaults = CameraConfig::default();

    let min = if min.is_finite() && min > 0.0 {
        min
    } else {
        log::warn!(
            "Camera min_distance {} must be a positive number, using {}",
            min,
            defaults.min_distance
        );
        defaults.min_distance
    };
    let max = if max.is_finite() && max > 0.0 {
        max
    } else {
        log::warn!(
            "Camera max_distance {} must be a positive number, using {}",
            max,
            defaults.max_distance
        );
        defaults.max_distance
    };

    if min > max {
        log::warn!(
            "Camera min_distance {} exceeds max_distance {}, swapping them",
            min,
            max
        );
        (max, min)
    } else {
        (min, max)
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose_looks_down_negative_z() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 1.5);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        camera.set_distance(1000.0);
        assert_eq!(camera.distance, CameraConfig::default().max_distance);
        camera.set_distance(0.0);
        assert_eq!(camera.distance, CameraConfig::default().min_distance);
    }

    #[test]
    fn test_inverted_distance_bounds_are_swapped() {
        let config = CameraConfig {
            min_distance: 10.0,
            max_distance: 5.0,
            ..Default::default()
        };
        let mut camera = OrbitCamera::from_config(&config, 1.0);
        assert_eq!(camera.bounds.min_distance, Some(5.0));
        assert_eq!(camera.bounds.max_distance, Some(10.0));

        camera.add_distance(-0.1);
        assert!((5.0..=10.0).contains(&camera.distance));
    }

    #[test]
    fn test_unusable_distance_bounds_fall_back_to_defaults() {
        let defaults = CameraConfig::default();
        let config = CameraConfig {
            min_distance: f32::NAN,
            max_distance: -3.0,
            ..Default::default()
        };
        let mut camera = OrbitCamera::from_config(&config, 1.0);
        assert_eq!(camera.bounds.min_distance, Some(defaults.min_distance));
        assert_eq!(camera.bounds.max_distance, Some(defaults.max_distance));

        camera.add_distance(1000.0);
        assert_eq!(camera.distance, defaults.max_distance);
    }

    #[test]
    fn test_set_distance_tolerates_hand_set_bounds() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(10.0);
        camera.bounds.max_distance = Some(5.0);
        camera.set_distance(7.0);
        assert!(camera.distance.is_finite());
    }

    #[test]
    fn test_pitch_never_reaches_pole() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_reset_restores_home_pose() {
        let mut camera = OrbitCamera::new(5.0, 0.2, 0.1, Vector3::zero(), 1.0);
        camera.add_yaw(1.0);
        camera.pan((1.0, 1.0));
        camera.set_distance(9.0);
        camera.reset_to_default();

        assert_eq!(camera.distance, 5.0);
        assert_eq!(camera.yaw, 0.1);
        assert_eq!(camera.target, Vector3::zero());
    }
}
