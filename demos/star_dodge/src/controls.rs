use arcade2d::{InputState, KeyCode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Source of the four directional signals polled every tick.
pub trait Controls {
    fn is_held(&self, direction: Direction) -> bool;
}

/// Arrow keys.
impl Controls for InputState {
    fn is_held(&self, direction: Direction) -> bool {
        let key = match direction {
            Direction::Up => KeyCode::ArrowUp,
            Direction::Down => KeyCode::ArrowDown,
            Direction::Left => KeyCode::ArrowLeft,
            Direction::Right => KeyCode::ArrowRight,
        };
        self.is_key_down(key)
    }
}

/// A fixed set of held directions, for scripted play and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
        self
    }
}

impl Controls for HeldDirections {
    fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade2d::ElementState;

    #[test]
    fn arrow_keys_map_to_directions() {
        let mut input = InputState::new();
        input.set_key(KeyCode::ArrowLeft, ElementState::Pressed);
        input.set_key(KeyCode::ArrowDown, ElementState::Pressed);

        assert!(input.is_held(Direction::Left));
        assert!(input.is_held(Direction::Down));
        assert!(!input.is_held(Direction::Up));
        assert!(!input.is_held(Direction::Right));
    }

    #[test]
    fn other_keys_are_not_directions() {
        let mut input = InputState::new();
        input.set_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(!input.is_held(Direction::Up));
    }

    #[test]
    fn held_directions_builder() {
        let held = HeldDirections::none()
            .with(Direction::Up)
            .with(Direction::Right);
        assert!(held.is_held(Direction::Up) && held.is_held(Direction::Right));
        assert!(!held.is_held(Direction::Down) && !held.is_held(Direction::Left));
    }
}
