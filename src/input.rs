//! Keyboard bindings
//!
//! Hosts forward key names (DOM `KeyboardEvent.key` values) and read back a
//! [`TickInput`] each frame. Note that `a` turns right and `d` turns left;
//! existing players rely on that layout.
//!
//! Fire is latched on the key-down edge, so a tap shorter than a frame is
//! not lost.

use crate::sim::TickInput;

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Thrust,
    Fire,
}

impl Action {
    /// Look up a key name. Unbound keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "d" | "D" => Some(Action::TurnLeft),
            "ArrowRight" | "a" | "A" => Some(Action::TurnRight),
            "ArrowUp" | "w" | "W" => Some(Action::Thrust),
            " " | "Spacebar" => Some(Action::Fire),
            _ => None,
        }
    }
}

/// Held-key tracker
#[derive(Debug, Clone, Default)]
pub struct InputState {
    turn_left: bool,
    turn_right: bool,
    thrust: bool,
    fire: bool,
    /// Fire went down since the last `intent()`
    fire_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    /// Returns true if the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: &str, pressed: bool) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        match action {
            Action::TurnLeft => self.turn_left = pressed,
            Action::TurnRight => self.turn_right = pressed,
            Action::Thrust => self.thrust = pressed,
            Action::Fire => {
                // Auto-repeat key-downs are not new presses
                if pressed && !self.fire {
                    self.fire_pressed = true;
                }
                self.fire = pressed;
            }
        }
        true
    }

    /// Intents for the next tick. Consumes the latched fire press.
    pub fn intent(&mut self) -> TickInput {
        TickInput {
            turn_left: self.turn_left,
            turn_right: self.turn_right,
            thrust: self.thrust,
            fire: self.fire,
            fire_pressed: std::mem::take(&mut self.fire_pressed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(Action::from_key("ArrowLeft"), Some(Action::TurnLeft));
        assert_eq!(Action::from_key("d"), Some(Action::TurnLeft));
        assert_eq!(Action::from_key("ArrowRight"), Some(Action::TurnRight));
        assert_eq!(Action::from_key("a"), Some(Action::TurnRight));
        assert_eq!(Action::from_key("w"), Some(Action::Thrust));
        assert_eq!(Action::from_key(" "), Some(Action::Fire));
        assert_eq!(Action::from_key("Spacebar"), Some(Action::Fire));
        assert_eq!(Action::from_key("q"), None);
    }

    #[test]
    fn test_held_keys_map_to_intent() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowUp"));
        assert!(input.key_down("d"));
        assert!(!input.key_down("Escape"));
        assert_eq!(
            input.intent(),
            TickInput {
                turn_left: true,
                thrust: true,
                ..Default::default()
            }
        );

        input.key_up("d");
        input.key_down(" ");
        let intent = input.intent();
        assert!(!intent.turn_left);
        assert!(intent.fire);
        assert!(intent.fire_pressed);
    }

    #[test]
    fn test_tap_within_one_frame_is_kept() {
        let mut input = InputState::new();
        input.key_down(" ");
        input.key_up(" ");

        let intent = input.intent();
        assert!(!intent.fire);
        assert!(intent.fire_pressed);
        // Reported once
        assert!(!input.intent().fire_pressed);
    }

    #[test]
    fn test_auto_repeat_is_one_press() {
        let mut input = InputState::new();
        input.key_down(" ");
        assert!(input.intent().fire_pressed);

        input.key_down(" ");
        input.key_down("Spacebar");
        let intent = input.intent();
        assert!(intent.fire);
        assert!(!intent.fire_pressed);
    }

    #[test]
    fn test_arrow_and_letter_share_state() {
        let mut input = InputState::new();
        input.key_down("ArrowRight");
        // Releasing the other binding of the same action releases it
        input.key_up("a");
        assert!(!input.intent().turn_right);
    }
}
