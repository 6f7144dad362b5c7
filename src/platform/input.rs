//! Keyboard and mouse state
//!
//! Browser events update an [`InputState`]; once per frame the game takes a
//! [`PlayerInput`] snapshot from it. Nothing is buffered between frames.
//!
//! Movement accepts WASD, ZQSD (AZERTY) and the arrow keys; Space dashes.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::PlayerInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Dash,
}

/// Map a key event (`KeyboardEvent.key`, `KeyboardEvent.code`) to an action
pub fn action_for(key: &str, code: &str) -> Option<Action> {
    let by_code = match code {
        "ArrowUp" | "KeyW" => Some(Action::Up),
        "ArrowDown" | "KeyS" => Some(Action::Down),
        "ArrowLeft" | "KeyA" => Some(Action::Left),
        "ArrowRight" | "KeyD" => Some(Action::Right),
        "Space" => Some(Action::Dash),
        _ => None,
    };
    by_code.or_else(|| match key.to_lowercase().as_str() {
        "w" | "z" | "arrowup" => Some(Action::Up),
        "s" | "arrowdown" => Some(Action::Down),
        "a" | "q" | "arrowleft" => Some(Action::Left),
        "d" | "arrowright" => Some(Action::Right),
        " " => Some(Action::Dash),
        _ => None,
    })
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Held keys by physical identity, with the action resolved at press time
    held: HashMap<String, Action>,
    pointer: Vec2,
    pointer_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true when the browser default (page
    /// scrolling) should be suppressed.
    pub fn key_down(&mut self, key: &str, code: &str) -> bool {
        match action_for(key, code) {
            Some(action) => {
                self.held.insert(held_id(key, code), action);
                code.starts_with("Arrow") || code == "Space"
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str, code: &str) {
        self.held.remove(&held_id(key, code));
    }

    /// Pointer position relative to the canvas
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    pub fn pointer_button(&mut self, down: bool) {
        self.pointer_down = down;
    }

    /// Drop everything (window lost focus)
    pub fn reset(&mut self) {
        self.held.clear();
        self.pointer_down = false;
    }

    fn active(&self, action: Action) -> bool {
        self.held.values().any(|&held| held == action)
    }

    pub fn snapshot(&self) -> PlayerInput {
        PlayerInput {
            up: self.active(Action::Up),
            down: self.active(Action::Down),
            left: self.active(Action::Left),
            right: self.active(Action::Right),
            dash: self.active(Action::Dash),
            pointer: self.pointer,
            pointer_down: self.pointer_down,
        }
    }
}

/// Physical key identity, falling back to the key text when there is no code
fn held_id(key: &str, code: &str) -> String {
    if code.is_empty() {
        key.to_lowercase()
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts() {
        assert_eq!(action_for("w", "KeyW"), Some(Action::Up));
        // AZERTY: the key labelled Z sits where W is
        assert_eq!(action_for("z", "KeyW"), Some(Action::Up));
        assert_eq!(action_for("q", ""), Some(Action::Left));
        assert_eq!(action_for(" ", "Space"), Some(Action::Dash));
        assert_eq!(action_for("ArrowRight", "ArrowRight"), Some(Action::Right));
        assert_eq!(action_for("p", "KeyP"), None);
    }

    #[test]
    fn test_snapshot_tracks_keys() {
        let mut input = InputState::new();
        input.key_down("d", "KeyD");
        input.key_down(" ", "Space");
        let snap = input.snapshot();
        assert!(snap.right && snap.dash && !snap.left);

        input.key_up("d", "KeyD");
        assert!(!input.snapshot().right);
    }

    #[test]
    fn test_two_bindings_same_action() {
        let mut input = InputState::new();
        input.key_down("w", "KeyW");
        input.key_down("ArrowUp", "ArrowUp");
        input.key_up("w", "KeyW");
        assert!(input.snapshot().up);
    }

    #[test]
    fn test_key_text_bindings_stay_held() {
        let mut input = InputState::new();
        input.key_down("q", "KeyQ");
        input.key_down("z", "KeyZ");
        let snap = input.snapshot();
        assert!(snap.left && snap.up);

        input.key_up("q", "KeyQ");
        let snap = input.snapshot();
        assert!(!snap.left && snap.up);

        // Release reports a different key text for the same physical key
        input.key_up("Z", "KeyZ");
        assert!(!input.snapshot().up);
    }

    #[test]
    fn test_arrows_and_space_suppress_scroll() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowDown", "ArrowDown"));
        assert!(input.key_down(" ", "Space"));
        assert!(!input.key_down("a", "KeyA"));
        assert!(!input.key_down("x", "KeyX"));
    }

    #[test]
    fn test_pointer_and_reset() {
        let mut input = InputState::new();
        input.pointer_move(12.0, 34.0);
        input.pointer_button(true);
        input.key_down("a", "KeyA");
        let snap = input.snapshot();
        assert_eq!(snap.pointer, Vec2::new(12.0, 34.0));
        assert!(snap.pointer_down && snap.left);

        input.reset();
        let snap = input.snapshot();
        assert!(!snap.pointer_down && !snap.left);
        assert_eq!(snap.pointer, Vec2::new(12.0, 34.0));
    }
}
