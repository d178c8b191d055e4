//! Keyboard input state for the flight controls.
//!
//! The simulation polls held state; it never consumes an event queue. Key
//! edges are kept for one frame so commands (weapon switch) fire once per press.

use std::collections::HashSet;

/// Closed set of flight controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
    YawLeft,
    YawRight,
    Fire,
    SwitchWeapon,
}

impl Control {
    pub const ALL: [Control; 10] = [
        Control::Forward,
        Control::Backward,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::Ascend,
        Control::Descend,
        Control::YawLeft,
        Control::YawRight,
        Control::Fire,
        Control::SwitchWeapon,
    ];

    /// Default key for this control.
    pub fn default_key(self) -> KeyCode {
        match self {
            Control::Forward => KeyCode::KeyW,
            Control::Backward => KeyCode::KeyS,
            Control::StrafeLeft => KeyCode::KeyA,
            Control::StrafeRight => KeyCode::KeyD,
            Control::Ascend => KeyCode::ArrowUp,
            Control::Descend => KeyCode::ArrowDown,
            Control::YawLeft => KeyCode::ArrowLeft,
            Control::YawRight => KeyCode::ArrowRight,
            Control::Fire => KeyCode::Space,
            Control::SwitchWeapon => KeyCode::KeyQ,
        }
    }
}

/// Manages key state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the end of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Drop everything (session end, focus loss).
    pub fn clear(&mut self) {
        self.keys_held.clear();
        self.begin_frame();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        log::trace!("{:?} {:?}", key, state);
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                if self.keys_held.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
        }
    }

    /// Shorthand for `process_keyboard(key, Pressed)`.
    pub fn press(&mut self, key: KeyCode) {
        self.process_keyboard(key, ElementState::Pressed);
    }

    /// Shorthand for `process_keyboard(key, Released)`.
    pub fn release(&mut self, key: KeyCode) {
        self.process_keyboard(key, ElementState::Released);
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a control's key is held.
    pub fn is_control_held(&self, control: Control) -> bool {
        self.is_key_held(control.default_key())
    }

    /// Check if a control's key went down this frame.
    pub fn is_control_pressed(&self, control: Control) -> bool {
        self.is_key_pressed(control.default_key())
    }

    /// Check if fire is held (Space).
    pub fn is_fire_held(&self) -> bool {
        self.is_control_held(Control::Fire)
    }

    /// Controls held right now, in `Control::ALL` order.
    pub fn held_controls(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL
            .into_iter()
            .filter(move |&control| self.is_control_held(control))
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_state_tracks_down_and_up() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        assert!(input.is_control_held(Control::Forward));
        input.release(KeyCode::KeyW);
        assert!(!input.is_control_held(Control::Forward));
    }

    #[test]
    fn press_edge_lasts_one_frame_and_ignores_repeats() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyQ);
        assert!(input.is_control_pressed(Control::SwitchWeapon));

        input.begin_frame();
        // OS auto-repeat delivers another Pressed while held.
        input.press(KeyCode::KeyQ);
        assert!(!input.is_control_pressed(Control::SwitchWeapon));
        assert!(input.is_control_held(Control::SwitchWeapon));
    }

    #[test]
    fn release_of_unheld_key_is_not_an_edge() {
        let mut input = InputState::new();
        input.release(KeyCode::Space);
        assert!(!input.is_key_released(KeyCode::Space));
    }

    #[test]
    fn clear_drops_held_keys() {
        let mut input = InputState::new();
        input.press(KeyCode::Space);
        input.press(KeyCode::KeyA);
        input.clear();
        assert_eq!(input.held_controls().count(), 0);
        assert!(!input.is_key_pressed(KeyCode::Space));
    }

    #[test]
    fn held_controls_lists_simultaneous_keys() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::KeyA);
        input.press(KeyCode::KeyP);
        let held: Vec<_> = input.held_controls().collect();
        assert_eq!(held, vec![Control::Forward, Control::StrafeLeft]);
    }
}
