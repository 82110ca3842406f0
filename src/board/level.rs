//! Level descriptions: map geometry, spawn points and file loading
//!
//! A level file is a JSON document:
//!
//! ```json
//! {
//!   "name": "crossfire",
//!   "players": 2,
//!   "width": 12,
//!   "height": 8,
//!   "rows": ["############", "#..........#", ...],
//!   "spawns": [[3, 4], [8, 4]]
//! }
//! ```
//!
//! `#` marks a wall, `.` or a space marks an empty cell. Loading either
//! yields a fully validated [`Level`] or fails without partial state.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::geometry::Position;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file")]
    Io(#[from] std::io::Error),

    #[error("malformed level file")]
    Parse(#[from] serde_json::Error),

    #[error("invalid level geometry: {0}")]
    InvalidGeometry(String),

    #[error("spawn point {player} at ({x}, {y}) is out of bounds or on a wall")]
    InvalidSpawn { player: usize, x: i32, y: i32 },
}

/// On-disk shape of a level file
#[derive(Debug, Deserialize)]
struct LevelFile {
    name: String,
    players: usize,
    width: usize,
    height: usize,
    rows: Vec<String>,
    spawns: Vec<(i32, i32)>,
}

/// A named map template: dimensions, wall layout, spawn points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Level {
    width: usize,
    height: usize,
    /// Wall flags in row-major order, indexed `y * width + x`.
    walls: Vec<bool>,
    spawns: Vec<Position>,
    players: usize,
    name: String,
}

impl Level {
    /// Generates a border-walled rectangle with an empty interior and a
    /// single spawn point at the center.
    pub fn generate_default(width: usize, height: usize) -> Self {
        let mut walls = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
                    walls[y * width + x] = true;
                }
            }
        }

        Self {
            width,
            height,
            walls,
            spawns: vec![Position::new(width as i32 / 2, height as i32 / 2)],
            players: 1,
            name: "default".to_string(),
        }
    }

    /// Loads and validates a level file.
    ///
    /// Returns a complete level or an error; a rejected file never
    /// produces a half-built level.
    pub fn load_from_file(path: &Path) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path)?;
        let raw: LevelFile = serde_json::from_str(&text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: LevelFile) -> Result<Self, LevelError> {
        if raw.width < 2 || raw.height < 2 {
            return Err(LevelError::InvalidGeometry(format!(
                "dimensions {}x{} are too small",
                raw.width, raw.height
            )));
        }
        if raw.rows.len() != raw.height {
            return Err(LevelError::InvalidGeometry(format!(
                "expected {} rows, found {}",
                raw.height,
                raw.rows.len()
            )));
        }
        if raw.players == 0 {
            return Err(LevelError::InvalidGeometry(
                "level must support at least one player".to_string(),
            ));
        }
        if raw.spawns.len() != raw.players {
            return Err(LevelError::InvalidGeometry(format!(
                "{} players declared but {} spawn points given",
                raw.players,
                raw.spawns.len()
            )));
        }

        let mut walls = Vec::with_capacity(raw.width * raw.height);
        for (y, row) in raw.rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().collect();
            if cells.len() != raw.width {
                return Err(LevelError::InvalidGeometry(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    cells.len(),
                    raw.width
                )));
            }
            for cell in cells {
                match cell {
                    '#' => walls.push(true),
                    '.' | ' ' => walls.push(false),
                    other => {
                        return Err(LevelError::InvalidGeometry(format!(
                            "unknown cell marker {:?} in row {}",
                            other, y
                        )));
                    }
                }
            }
        }

        let level = Self {
            width: raw.width,
            height: raw.height,
            walls,
            spawns: raw
                .spawns
                .iter()
                .map(|&(x, y)| Position::new(x, y))
                .collect(),
            players: raw.players,
            name: raw.name,
        };

        // Every spawn must land strictly inside the map on a free cell.
        for (player, spawn) in level.spawns.iter().enumerate() {
            let in_bounds = spawn.x >= 0
                && (spawn.x as usize) < level.width
                && spawn.y >= 0
                && (spawn.y as usize) < level.height;
            if !in_bounds || level.is_wall(spawn.x, spawn.y) {
                return Err(LevelError::InvalidSpawn {
                    player,
                    x: spawn.x,
                    y: spawn.y,
                });
            }
        }

        Ok(level)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True if the cell at (x, y) is a wall. Out-of-range coordinates
    /// are not walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.walls[y * self.width + x]
    }

    /// Starting position for player `index`, or None when the level
    /// supports fewer players.
    pub fn spawn_point(&self, index: usize) -> Option<Position> {
        self.spawns.get(index).copied()
    }

    pub fn supported_players(&self) -> usize {
        self.players
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
