use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Orbit controls that stay off the left mouse button, which places objects.
///
/// Right drag orbits, middle drag (or Shift + right drag) pans, the wheel
/// zooms and Shift + C resets the view.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    is_orbit_pressed: bool,
    is_pan_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_shift_held: false,
            is_orbit_pressed: false,
            is_pan_pressed: false,
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Right => self.is_orbit_pressed = pressed,
                    MouseButton::Middle => self.is_pan_pressed = pressed,
                    _ => (),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.1
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_keyed_events(event, camera),
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused.
                self.is_orbit_pressed = false;
                self.is_pan_pressed = false;
                self.is_shift_held = false;
            }
            _ => (),
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.is_panning() {
                camera.pan((
                    -delta.0 as f32 * self.pan_speed,
                    delta.1 as f32 * self.pan_speed,
                ));
            } else if self.is_rotating() {
                camera.add_yaw(-delta.0 as f32 * self.rotate_speed);
                camera.add_pitch(delta.1 as f32 * self.rotate_speed);
            }
        }
    }

    fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held {
                    log::info!("Resetting camera to default position");
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_pan_pressed || (self.is_orbit_pressed && self.is_shift_held)
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_orbit_pressed && !self.is_shift_held
    }

    /// Adjust panning sensitivity
    pub fn set_pan_speed(&mut self, speed: f32) {
        self.pan_speed = speed;
    }
}
