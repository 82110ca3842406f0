use crate::board::Position;

use super::action::Direction;

/// The snake: body segments with the head at index 0
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Builds a snake from explicit segments, head first.
    ///
    /// The engine decides where segments may lie (spawn points, free
    /// tiles); the snake just owns them.
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty(), "a snake needs at least a head");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Body segments excluding the head
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if a position collides with the body (excluding the head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if any segment, head included, sits on a position
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Advance the head to `new_head`, which the engine has already
    /// resolved against borders and collisions.
    ///
    /// Returns the vacated tail position, or None when growing.
    pub fn advance(&mut self, new_head: Position, grow: bool) -> Option<Position> {
        self.body.insert(0, new_head);
        if grow { None } else { self.body.pop() }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
