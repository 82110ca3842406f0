//! The live playfield: a tile grid built from a level, plus the pacing
//! and border rules the game loop consults every tick.

use std::path::Path;
use std::time::Duration;

use super::geometry::{Position, Rectangle};
use super::level::{Level, LevelError};
use super::tile::{Tile, TileKind};

/// Base tick interval at speed 1, in milliseconds.
const BASE_TIMEOUT_MS: u64 = 1000;

/// Ticks never fire faster than this, no matter the speed.
const MIN_TIMEOUT_MS: u64 = 40;

/// What happens when the snake crosses the edge of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// Crossing the edge is lethal.
    Solid,
    /// Crossing the edge teleports to the opposite side.
    #[default]
    Wrap,
}

/// The game board, where all the action happens.
///
/// Owns a rectangular grid of tiles sized to the loaded level, the
/// border policy, and the speed/timeout pair that paces the game loop.
#[derive(Debug, Clone)]
pub struct Board {
    /// All tiles in row-major order, indexed `y * width + x`.
    tiles: Vec<Tile>,
    /// The currently loaded level, replaced wholesale on every reload.
    level: Level,
    speed: u32,
    timeout: Duration,
    /// Screen placement and grid dimensions.
    bounds: Rectangle,
    policy: BorderPolicy,
}

impl Board {
    /// Creates a blank board sized to `bounds`. No level content is
    /// loaded; every tile starts empty.
    pub fn new(bounds: Rectangle, policy: BorderPolicy) -> Self {
        Self {
            tiles: vec![Tile::default(); bounds.width * bounds.height],
            level: Level::default(),
            speed: 1,
            timeout: Self::timeout_for(1),
            bounds,
            policy,
        }
    }

    /// Discards the grid and the loaded level, allocating a fresh blank
    /// grid at the given rectangle. A zero-size rectangle yields an
    /// empty grid that callers must not query.
    pub fn clear(&mut self, bounds: Rectangle) {
        self.tiles = vec![Tile::default(); bounds.width * bounds.height];
        self.level = Level::default();
        self.bounds = bounds;
    }

    /// Loads the default level: a box of border walls at the current
    /// board dimensions, interior empty.
    pub fn load_default_level(&mut self) {
        let level = Level::generate_default(self.width(), self.height());
        self.apply_level(level);
    }

    /// Loads the level at `path`, resizing the grid to its dimensions.
    ///
    /// Parsing and validation happen before any board state is touched;
    /// on error the grid, level and dimensions are exactly as before.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LevelError> {
        let level = Level::load_from_file(path)?;
        self.bounds.width = level.width();
        self.bounds.height = level.height();
        self.apply_level(level);
        Ok(())
    }

    fn apply_level(&mut self, level: Level) {
        let (width, height) = (level.width(), level.height());
        self.tiles = vec![Tile::default(); width * height];
        for y in 0..height {
            for x in 0..width {
                if level.is_wall(x as i32, y as i32) {
                    self.tiles[y * width + x].set_kind(TileKind::Wall);
                }
            }
        }
        self.level = level;
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.is_inside_map(x, y),
            "tile access out of bounds: ({}, {})",
            x,
            y
        );
        y as usize * self.bounds.width + x as usize
    }

    /// The tile at (x, y). Panics when (x, y) is outside the map;
    /// callers gate with [`Board::is_inside_map`].
    pub fn at(&self, x: i32, y: i32) -> &Tile {
        &self.tiles[self.index(x, y)]
    }

    /// Mutable access to the tile at (x, y). Same bounds contract as
    /// [`Board::at`].
    pub fn at_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        let index = self.index(x, y);
        &mut self.tiles[index]
    }

    /// Tells if a point (x, y) is inside the game map.
    ///
    /// Boards are always rectangular, so this is a plain bounds check.
    pub fn is_inside_map(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.bounds.width && y >= 0 && (y as usize) < self.bounds.height
    }

    /// Returns the max length any snake may have inside this board:
    /// the number of non-wall tiles.
    pub fn max_length_inside(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| !tile.kind().is_wall())
            .count()
    }

    pub fn border_policy(&self) -> BorderPolicy {
        self.policy
    }

    pub fn set_border_policy(&mut self, policy: BorderPolicy) {
        self.policy = policy;
    }

    /// True when crossing the edge kills rather than teleports.
    pub fn has_borders(&self) -> bool {
        self.policy == BorderPolicy::Solid
    }

    pub fn width(&self) -> usize {
        self.bounds.width
    }

    pub fn height(&self) -> usize {
        self.bounds.height
    }

    /// How many players the current level supports.
    pub fn supported_players(&self) -> usize {
        self.level.supported_players()
    }

    /// Starting position for `player` in the current level, or None
    /// when the level supports fewer players.
    pub fn spawn_point_for(&self, player: usize) -> Option<Position> {
        self.level.spawn_point(player)
    }

    pub fn level_name(&self) -> &str {
        self.level.name()
    }

    fn timeout_for(speed: u32) -> Duration {
        let millis = (BASE_TIMEOUT_MS / u64::from(speed)).max(MIN_TIMEOUT_MS);
        Duration::from_millis(millis)
    }

    /// Sets the game speed. Speeds below 1 are clamped to 1.
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.max(1);
        self.timeout = Self::timeout_for(self.speed);
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Bumps the speed one step and shortens the tick interval.
    pub fn increase_speed(&mut self) {
        self.set_speed(self.speed + 1);
    }

    /// How long the game loop waits between ticks at the current speed.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn x(&self) -> i32 {
        self.bounds.x
    }

    pub fn y(&self) -> i32 {
        self.bounds.y
    }

    /// Repositions the board on screen without touching the grid.
    pub fn set_x(&mut self, x: i32) {
        self.bounds.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.bounds.y = y;
    }
}
