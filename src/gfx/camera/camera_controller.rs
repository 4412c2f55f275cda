use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// What a mouse drag currently does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Idle,
    Rotate,
    /// Shift held: moves the focus point
    Pan,
}

/// Orbit controls: drag rotates, shift-drag pans, wheel zooms, shift+C resets
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    shift_held: bool,
    button_held: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32, pan_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed,
            shift_held: false,
            button_held: false,
        }
    }

    pub fn drag_mode(&self) -> DragMode {
        match (self.button_held, self.shift_held) {
            (false, _) => DragMode::Idle,
            (true, false) => DragMode::Rotate,
            (true, true) => DragMode::Pan,
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.button_held = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                self.zoom(lines, camera);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.drag(*delta, camera) {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        self.key(code, event.state, camera);
    }

    /// Applies a key transition; split out of winit's `KeyEvent` for tests
    fn key(&mut self, code: KeyCode, state: ElementState, camera: &mut OrbitCamera) {
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.shift_held = state == ElementState::Pressed;
            }
            KeyCode::KeyC if state == ElementState::Pressed && self.shift_held => {
                log::debug!("Resetting camera to its home pose");
                camera.reset_to_default();
            }
            _ => (),
        }
    }

    /// Scrolling up (positive) moves the camera closer
    fn zoom(&self, lines: f32, camera: &mut OrbitCamera) {
        camera.add_distance(-lines * self.zoom_speed);
    }

    /// Returns true if the camera moved
    fn drag(&self, delta: (f64, f64), camera: &mut OrbitCamera) -> bool {
        let (dx, dy) = (delta.0 as f32, delta.1 as f32);
        match self.drag_mode() {
            DragMode::Idle => false,
            DragMode::Rotate => {
                camera.add_yaw(-dx * self.rotate_speed);
                camera.add_pitch(dy * self.rotate_speed);
                true
            }
            DragMode::Pan => {
                camera.pan((-dx * self.pan_speed, dy * self.pan_speed));
                true
            }
        }
    }

    /// Releases held buttons, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.shift_held = false;
        self.button_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    #[test]
    fn test_drag_without_button_is_ignored() {
        let controller = CameraController::new(0.01, 0.1, 0.01);
        let mut camera = camera();
        assert!(!controller.drag((10.0, 10.0), &mut camera));
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn test_drag_rotates_and_shift_drag_pans() {
        let mut controller = CameraController::new(0.01, 0.1, 0.01);
        let mut camera = camera();
        controller.button_held = true;

        assert_eq!(controller.drag_mode(), DragMode::Rotate);
        controller.drag((-10.0, 0.0), &mut camera);
        assert!((camera.yaw - 0.1).abs() < 1e-6);

        controller.key(KeyCode::ShiftLeft, ElementState::Pressed, &mut camera);
        assert_eq!(controller.drag_mode(), DragMode::Pan);
        let target = camera.target;
        controller.drag((10.0, 0.0), &mut camera);
        assert_ne!(camera.target, target);
    }

    #[test]
    fn test_shift_c_resets_pose() {
        let mut controller = CameraController::new(0.01, 0.1, 0.01);
        let mut camera = camera();
        camera.add_yaw(1.0);

        controller.key(KeyCode::KeyC, ElementState::Pressed, &mut camera);
        assert_eq!(camera.yaw, 1.0);

        controller.key(KeyCode::ShiftRight, ElementState::Pressed, &mut camera);
        controller.key(KeyCode::KeyC, ElementState::Pressed, &mut camera);
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn test_release_all_stops_dragging() {
        let mut controller = CameraController::new(0.01, 0.1, 0.01);
        controller.button_held = true;
        controller.shift_held = true;
        controller.release_all();
        assert_eq!(controller.drag_mode(), DragMode::Idle);
    }
}
