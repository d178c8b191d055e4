//! Scripted key timeline for the headless demo flight.

use input::{ElementState, InputState, KeyCode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedKey {
    /// Seconds since session start.
    pub at: f32,
    pub key: KeyCode,
    pub state: ElementState,
}

/// Replays key events into an `InputState` as simulated time passes.
#[derive(Debug, Clone)]
pub struct PilotScript {
    events: Vec<ScriptedKey>,
    cursor: usize,
}

impl PilotScript {
    /// Events are sorted by time; ties keep their given order.
    pub fn new(mut events: Vec<ScriptedKey>) -> Self {
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { events, cursor: 0 }
    }

    /// Burn forward, strafe while firing, swap to rockets, turn, brake.
    pub fn demo() -> Self {
        let mut events = Vec::new();
        let mut hold = |from: f32, to: f32, key: KeyCode| {
            events.push(ScriptedKey { at: from, key, state: ElementState::Pressed });
            events.push(ScriptedKey { at: to, key, state: ElementState::Released });
        };
        hold(0.0, 3.0, KeyCode::KeyW);
        hold(1.0, 2.5, KeyCode::Space);
        hold(2.0, 3.5, KeyCode::KeyA);
        hold(4.0, 4.1, KeyCode::KeyQ);
        hold(4.5, 7.5, KeyCode::Space);
        hold(5.0, 8.0, KeyCode::ArrowLeft);
        hold(6.0, 7.0, KeyCode::ArrowUp);
        hold(8.0, 11.0, KeyCode::KeyS);
        hold(9.0, 9.1, KeyCode::KeyQ);
        hold(9.5, 10.5, KeyCode::Space);
        Self::new(events)
    }

    /// Feed every event due at or before `elapsed`. Returns how many fired.
    pub fn apply_due(&mut self, elapsed: f32, input: &mut InputState) -> usize {
        let start = self.cursor;
        while let Some(event) = self.events.get(self.cursor) {
            if event.at > elapsed {
                break;
            }
            input.process_keyboard(event.key, event.state);
            self.cursor += 1;
        }
        self.cursor - start
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::Control;

    #[test]
    fn events_fire_once_in_time_order() {
        let mut script = PilotScript::new(vec![
            ScriptedKey { at: 1.0, key: KeyCode::KeyW, state: ElementState::Released },
            ScriptedKey { at: 0.0, key: KeyCode::KeyW, state: ElementState::Pressed },
        ]);
        let mut input = InputState::new();

        assert_eq!(script.apply_due(0.5, &mut input), 1);
        assert!(input.is_control_held(Control::Forward));
        assert_eq!(script.apply_due(0.5, &mut input), 0);

        assert_eq!(script.apply_due(1.0, &mut input), 1);
        assert!(!input.is_control_held(Control::Forward));
        assert!(script.is_finished());
    }

    #[test]
    fn demo_script_releases_everything_it_presses() {
        let mut script = PilotScript::demo();
        let mut input = InputState::new();
        script.apply_due(f32::MAX, &mut input);
        assert!(script.is_finished());
        assert_eq!(input.held_controls().count(), 0);
    }
}
