//! Input events for the placement controller
//!
//! The app translates winit window events into [`InputEvent`]s and pushes
//! them through an [`InputSender`]. The placement controller owns the
//! matching [`InputSubscription`] and drains it once per frame, handling the
//! events in the order they arrived.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Pointer, keyboard and viewport events the placement core reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in physical pixels from the top-left corner.
    PointerMoved { x: f32, y: f32 },
    /// Primary button pressed.
    Click,
    KeyDown(KeyCode),
    Resized { width: u32, height: u32 },
}

/// Creates a connected sender/subscription pair.
pub fn channel() -> (InputSender, InputSubscription) {
    let (tx, rx) = mpsc::channel();
    (InputSender { tx }, InputSubscription { rx })
}

/// Producing end, held by the app.
#[derive(Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queues an event. Returns `false` when the subscription was dropped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Translates and queues a window event. Returns `true` if one was queued.
    pub fn forward_window_event(&self, event: &WindowEvent) -> bool {
        match translate_window_event(event) {
            Some(input) => self.send(input),
            None => false,
        }
    }
}

/// Consuming end, held by the placement controller.
pub struct InputSubscription {
    rx: Receiver<InputEvent>,
}

impl InputSubscription {
    /// Next queued event, if any. Never blocks.
    pub fn try_next(&self) -> Option<InputEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Maps the window events the placement core cares about.
///
/// Only presses count: button releases and key repeats are dropped.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput {
            state: ElementState::Pressed,
            button: MouseButton::Left,
            ..
        } => Some(InputEvent::Click),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } => Some(InputEvent::KeyDown(*code)),
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    fn device_id() -> winit::event::DeviceId {
        // SAFETY: the dummy id is never handed back to winit.
        unsafe { winit::event::DeviceId::dummy() }
    }

    #[test]
    fn events_are_drained_in_order() {
        let (sender, subscription) = channel();
        assert!(sender.send(InputEvent::PointerMoved { x: 1.0, y: 2.0 }));
        assert!(sender.send(InputEvent::Click));
        assert!(sender.send(InputEvent::KeyDown(KeyCode::Digit2)));

        assert_eq!(subscription.try_next(), Some(InputEvent::PointerMoved { x: 1.0, y: 2.0 }));
        assert_eq!(subscription.try_next(), Some(InputEvent::Click));
        assert_eq!(subscription.try_next(), Some(InputEvent::KeyDown(KeyCode::Digit2)));
        assert!(subscription.try_next().is_none());
    }

    #[test]
    fn sending_after_subscription_dropped_reports_false() {
        let (sender, subscription) = channel();
        drop(subscription);
        assert!(!sender.send(InputEvent::Click));
    }

    #[test]
    fn only_left_presses_become_clicks() {
        let press = |button, state| WindowEvent::MouseInput {
            device_id: device_id(),
            state,
            button,
        };
        assert_eq!(
            translate_window_event(&press(MouseButton::Left, ElementState::Pressed)),
            Some(InputEvent::Click)
        );
        assert_eq!(translate_window_event(&press(MouseButton::Left, ElementState::Released)), None);
        assert_eq!(translate_window_event(&press(MouseButton::Right, ElementState::Pressed)), None);
    }

    #[test]
    fn cursor_and_resize_are_translated() {
        let moved = WindowEvent::CursorMoved {
            device_id: device_id(),
            position: PhysicalPosition::new(120.5, 64.0),
        };
        assert_eq!(
            translate_window_event(&moved),
            Some(InputEvent::PointerMoved { x: 120.5, y: 64.0 })
        );

        let resized = WindowEvent::Resized(PhysicalSize::new(1024, 768));
        assert_eq!(
            translate_window_event(&resized),
            Some(InputEvent::Resized {
                width: 1024,
                height: 768
            })
        );
    }
}
