//! Keyboard state tracking for held paddle directions

use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Left,
    Right,
}

impl GameKey {
    /// Map a physical key to a game key. Arrows, with A/D as aliases.
    pub fn from_physical(key: PhysicalKey) -> Option<Self> {
        match key {
            PhysicalKey::Code(KeyCode::ArrowLeft | KeyCode::KeyA) => Some(GameKey::Left),
            PhysicalKey::Code(KeyCode::ArrowRight | KeyCode::KeyD) => Some(GameKey::Right),
            _ => None,
        }
    }
}

/// Collects key press/release events into held-direction intents.
///
/// Presses set a flag, releases clear it. Native key repeat re-sends presses,
/// which leave the flag unchanged.
#[derive(Debug, Default)]
pub struct InputCollector {
    intents: TickInput,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns true if the key was one of ours.
    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        match GameKey::from_physical(key) {
            Some(game_key) => {
                self.set(game_key, state.is_pressed());
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, key: GameKey, held: bool) {
        match key {
            GameKey::Left => self.intents.left_down = held,
            GameKey::Right => self.intents.right_down = held,
        }
    }

    /// Drop all held keys (window lost focus)
    pub fn release_all(&mut self) {
        self.intents = TickInput::default();
    }

    pub fn intents(&self) -> TickInput {
        self.intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: PhysicalKey = PhysicalKey::Code(KeyCode::ArrowLeft);
    const RIGHT: PhysicalKey = PhysicalKey::Code(KeyCode::ArrowRight);

    #[test]
    fn test_press_and_release() {
        let mut input = InputCollector::new();
        assert!(input.handle_key(LEFT, ElementState::Pressed));
        assert!(input.intents().left_down);
        assert!(!input.intents().right_down);

        assert!(input.handle_key(LEFT, ElementState::Released));
        assert_eq!(input.intents(), TickInput::default());
    }

    #[test]
    fn test_repeat_is_idempotent() {
        let mut input = InputCollector::new();
        for _ in 0..5 {
            input.handle_key(RIGHT, ElementState::Pressed);
        }
        assert!(input.intents().right_down);
        input.handle_key(RIGHT, ElementState::Released);
        assert!(!input.intents().right_down);
    }

    #[test]
    fn test_both_held() {
        let mut input = InputCollector::new();
        input.handle_key(LEFT, ElementState::Pressed);
        input.handle_key(RIGHT, ElementState::Pressed);
        assert_eq!(
            input.intents(),
            TickInput {
                left_down: true,
                right_down: true
            }
        );
    }

    #[test]
    fn test_aliases_and_unrelated_keys() {
        let mut input = InputCollector::new();
        assert!(input.handle_key(PhysicalKey::Code(KeyCode::KeyA), ElementState::Pressed));
        assert!(input.intents().left_down);
        assert!(!input.handle_key(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed));
        assert_eq!(
            input.intents(),
            TickInput {
                left_down: true,
                right_down: false
            }
        );
    }

    #[test]
    fn test_release_all() {
        let mut input = InputCollector::new();
        input.set(GameKey::Left, true);
        input.set(GameKey::Right, true);
        input.release_all();
        assert_eq!(input.intents(), TickInput::default());
    }
}
