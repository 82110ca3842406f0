use anyhow::{Context, Result};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

use crate::board::{Board, BorderPolicy, Position, TileKind};

use super::action::{Action, Direction};
use super::snake::Snake;

/// How many segments a freshly spawned snake tries to have. Spawns
/// close to a wall start shorter and grow back while playing.
const INITIAL_SNAKE_LENGTH: i32 = 3;

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake crossed a solid map edge
    Border,
    /// Snake hit a wall tile
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// Complete state of one running game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Current food position; None when the board is full.
    pub food: Option<Position>,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

/// Per-tick game logic: border resolution, collisions, food and growth.
///
/// The engine consults the board for geometry and policy, and writes
/// the snake and food back into its tiles after every step.
pub struct GameEngine {
    rng: ThreadRng,
}

impl GameEngine {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Starts a game on the board's first spawn point.
    ///
    /// Fails when the loaded level defines no spawn points (a blank
    /// board before any level is loaded).
    pub fn start(&mut self, board: &mut Board) -> Result<GameState> {
        let spawn = board
            .spawn_point_for(0)
            .context("current level has no spawn point")?;

        let direction = Direction::Right;
        let (dx, dy) = direction.delta();
        let mut segments = vec![spawn];
        for i in 1..INITIAL_SNAKE_LENGTH {
            let pos = spawn.moved_by(-dx * i, -dy * i);
            if !board.is_inside_map(pos.x, pos.y) || board.at(pos.x, pos.y).kind().is_wall() {
                break;
            }
            segments.push(pos);
        }

        let snake = Snake::from_segments(segments, direction);
        for &segment in snake.body_segments() {
            board
                .at_mut(segment.x, segment.y)
                .set_kind(TileKind::SnakeBody);
        }
        let head = snake.head();
        board.at_mut(head.x, head.y).set_kind(TileKind::SnakeHead);

        let mut state = GameState {
            snake,
            food: None,
            score: 0,
            steps: 0,
            is_alive: true,
        };
        self.respawn_food(board, &mut state);
        Ok(state)
    }

    /// Execute one step of the game
    pub fn step(&mut self, board: &mut Board, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                terminated: true,
                ate_food: false,
                collision: None,
            };
        }

        // Update direction based on action (prevent 180-degree turns)
        if let Action::Move(direction) = action {
            if !state.snake.direction.is_opposite(direction) {
                state.snake.direction = direction;
            }
        }

        let (dx, dy) = state.snake.direction.delta();
        let mut candidate = state.snake.head().moved_by(dx, dy);

        // Resolve the map edge according to the board's border policy.
        if !board.is_inside_map(candidate.x, candidate.y) {
            match board.border_policy() {
                BorderPolicy::Solid => return Self::kill(state, CollisionType::Border),
                BorderPolicy::Wrap => {
                    candidate = Position::new(
                        candidate.x.rem_euclid(board.width() as i32),
                        candidate.y.rem_euclid(board.height() as i32),
                    );
                }
            }
        }

        if board.at(candidate.x, candidate.y).kind().is_wall() {
            return Self::kill(state, CollisionType::Wall);
        }
        if state.snake.collides_with_body(candidate) {
            return Self::kill(state, CollisionType::SelfCollision);
        }

        let ate_food = state.food == Some(candidate);
        let grow = ate_food && state.snake.len() < board.max_length_inside();

        // Move the snake and mirror it into the tiles.
        let old_head = state.snake.head();
        board
            .at_mut(old_head.x, old_head.y)
            .set_kind(TileKind::SnakeBody);
        if let Some(vacated) = state.snake.advance(candidate, grow) {
            board.at_mut(vacated.x, vacated.y).set_kind(TileKind::Empty);
        }
        board
            .at_mut(candidate.x, candidate.y)
            .set_kind(TileKind::SnakeHead);

        if ate_food {
            state.score += 1;
            board.increase_speed();
            self.respawn_food(board, state);
        }

        state.steps += 1;
        StepResult {
            terminated: false,
            ate_food,
            collision: None,
        }
    }

    fn kill(state: &mut GameState, collision: CollisionType) -> StepResult {
        state.is_alive = false;
        state.steps += 1;
        StepResult {
            terminated: true,
            ate_food: false,
            collision: Some(collision),
        }
    }

    /// Place food on a random empty tile; None when the board is full.
    fn respawn_food(&mut self, board: &mut Board, state: &mut GameState) {
        let mut free = Vec::new();
        for y in 0..board.height() as i32 {
            for x in 0..board.width() as i32 {
                if board.at(x, y).kind() == TileKind::Empty {
                    free.push(Position::new(x, y));
                }
            }
        }

        state.food = free.choose(&mut self.rng).copied();
        if let Some(food) = state.food {
            board.at_mut(food.x, food.y).set_kind(TileKind::Food);
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Rectangle;

    fn blank_board(width: usize, height: usize, policy: BorderPolicy) -> Board {
        Board::new(Rectangle::new(0, 0, width, height), policy)
    }

    fn state_with_snake(segments: Vec<Position>, direction: Direction) -> GameState {
        GameState {
            snake: Snake::from_segments(segments, direction),
            food: None,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Mirror a hand-built snake into the board tiles, the way
    /// `GameEngine::start` does for a real game.
    fn place_snake(board: &mut Board, state: &GameState) {
        for &segment in state.snake.body_segments() {
            board
                .at_mut(segment.x, segment.y)
                .set_kind(TileKind::SnakeBody);
        }
        let head = state.snake.head();
        board.at_mut(head.x, head.y).set_kind(TileKind::SnakeHead);
    }

    #[test]
    fn test_start_places_snake_at_spawn() {
        let mut board = blank_board(10, 8, BorderPolicy::Wrap);
        board.load_default_level();
        let mut engine = GameEngine::new();

        let state = engine.start(&mut board).unwrap();

        let spawn = board.spawn_point_for(0).unwrap();
        assert_eq!(state.snake.head(), spawn);
        assert_eq!(state.snake.len(), 3);
        assert!(state.is_alive);
        assert_eq!(board.at(spawn.x, spawn.y).kind(), TileKind::SnakeHead);

        let food = state.food.expect("board has room for food");
        assert_eq!(board.at(food.x, food.y).kind(), TileKind::Food);
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_start_without_spawn_fails() {
        // A blank board has no level loaded, hence no spawn points.
        let mut board = blank_board(6, 6, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();

        assert!(engine.start(&mut board).is_err());
    }

    #[test]
    fn test_wrap_teleports_to_opposite_edge() {
        let mut board = blank_board(5, 4, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(
            vec![Position::new(4, 2), Position::new(3, 2)],
            Direction::Right,
        );

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(0, 2));
        assert!(state.is_alive);
    }

    #[test]
    fn test_wrap_teleports_vertically() {
        let mut board = blank_board(5, 4, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(vec![Position::new(2, 0)], Direction::Up);

        engine.step(&mut board, &mut state, Action::Continue);

        assert_eq!(state.snake.head(), Position::new(2, 3));
    }

    #[test]
    fn test_solid_border_kills() {
        let mut board = blank_board(5, 4, BorderPolicy::Solid);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(
            vec![Position::new(4, 2), Position::new(3, 2)],
            Direction::Right,
        );

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.collision, Some(CollisionType::Border));
    }

    #[test]
    fn test_wall_tile_kills() {
        let mut board = blank_board(10, 8, BorderPolicy::Wrap);
        board.load_default_level();
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(vec![Position::new(1, 1)], Direction::Left);

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(result.collision, Some(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision_kills() {
        let mut board = blank_board(8, 8, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        // Head at (5,5) with the body hooked below it.
        let mut state = state_with_snake(
            vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
            ],
            Direction::Down,
        );

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(result.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_eating_grows_and_speeds_up() {
        let mut board = blank_board(6, 3, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(
            vec![Position::new(2, 1), Position::new(1, 1)],
            Direction::Right,
        );
        place_snake(&mut board, &state);
        state.food = Some(Position::new(3, 1));
        board.at_mut(3, 1).set_kind(TileKind::Food);
        let speed_before = board.speed();

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(result.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(board.speed(), speed_before + 1);

        let food = state.food.expect("board still has empty tiles");
        assert_eq!(board.at(food.x, food.y).kind(), TileKind::Food);
    }

    #[test]
    fn test_growth_fills_capacity() {
        // A 5x3 default level leaves a 3x1 playable corridor.
        let mut board = blank_board(5, 3, BorderPolicy::Wrap);
        board.load_default_level();
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(
            vec![Position::new(2, 1), Position::new(1, 1)],
            Direction::Right,
        );
        place_snake(&mut board, &state);
        state.food = Some(Position::new(3, 1));
        board.at_mut(3, 1).set_kind(TileKind::Food);

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(result.ate_food);
        assert_eq!(state.snake.len(), board.max_length_inside());
        // Nowhere left to put food.
        assert_eq!(state.food, None);
    }

    #[test]
    fn test_tiles_mirror_movement() {
        let mut board = blank_board(6, 3, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(
            vec![Position::new(2, 1), Position::new(1, 1)],
            Direction::Right,
        );
        place_snake(&mut board, &state);

        engine.step(&mut board, &mut state, Action::Continue);

        assert_eq!(board.at(3, 1).kind(), TileKind::SnakeHead);
        assert_eq!(board.at(2, 1).kind(), TileKind::SnakeBody);
        assert_eq!(board.at(1, 1).kind(), TileKind::Empty);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut board = blank_board(6, 3, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(
            vec![Position::new(2, 1), Position::new(1, 1)],
            Direction::Right,
        );

        engine.step(&mut board, &mut state, Action::Move(Direction::Left));

        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(3, 1));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut board = blank_board(6, 3, BorderPolicy::Wrap);
        let mut engine = GameEngine::new();
        let mut state = state_with_snake(vec![Position::new(2, 1)], Direction::Right);
        state.is_alive = false;
        let steps_before = state.steps;

        let result = engine.step(&mut board, &mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(state.steps, steps_before);
    }
}
