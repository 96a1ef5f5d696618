use std::collections::BTreeSet;
use std::path::Path;

use crate::infra::{GRID_SIZE, Position};
use crate::state::{Cell, Map};

/// Maze shipped with the binary, used when no level file is configured.
pub const CLASSIC_LEVEL: &str = include_str!("../../levels/classic.txt");

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("level has {found} rows, expected {expected}")]
    RowCount { found: usize, expected: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },
    #[error("level has no Pac-Man spawn ('P')")]
    MissingPacman,
    #[error("second Pac-Man spawn at {0}")]
    DuplicatePacman(Position),
}

/// Parsed level: static maze plus the initial placement of everything that
/// moves or can be eaten.
#[derive(Debug, Clone)]
pub struct Level {
    pub map: Map,
    pub pacman: Position,
    pub ghosts: Vec<Position>,
    pub pellets: BTreeSet<Position>,
    pub power_pellets: BTreeSet<Position>,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn classic() -> Result<Self, LevelError> {
        Self::parse(CLASSIC_LEVEL)
    }

    /// Parses a 25x25 text grid. Besides the cell glyphs, `P` marks the
    /// Pac-Man spawn and `G` a ghost spawn; both sit on empty floor.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let expected = GRID_SIZE as usize;
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != expected {
            return Err(LevelError::RowCount {
                found: lines.len(),
                expected,
            });
        }

        let mut map = Map::new(GRID_SIZE, GRID_SIZE);
        let mut pacman = None;
        let mut ghosts = Vec::new();
        let mut pellets = BTreeSet::new();
        let mut power_pellets = BTreeSet::new();

        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != expected {
                return Err(LevelError::RowWidth {
                    row,
                    found: width,
                    expected,
                });
            }

            for (col, glyph) in line.chars().enumerate() {
                let position = Position::new(row as i32, col as i32);
                match glyph {
                    'P' => {
                        if pacman.replace(position).is_some() {
                            return Err(LevelError::DuplicatePacman(position));
                        }
                    }
                    'G' => ghosts.push(position),
                    _ => match Cell::from_glyph(glyph) {
                        Some(Cell::Wall) => map.add_wall(position),
                        Some(Cell::Pellet) => {
                            pellets.insert(position);
                        }
                        Some(Cell::PowerPellet) => {
                            power_pellets.insert(position);
                        }
                        Some(Cell::Empty) => {}
                        None => return Err(LevelError::UnknownGlyph { glyph, position }),
                    },
                }
            }
        }

        let pacman = pacman.ok_or(LevelError::MissingPacman)?;
        tracing::debug!(
            pacman = %pacman,
            ghosts = ghosts.len(),
            pellets = pellets.len(),
            power_pellets = power_pellets.len(),
            walls = map.len(),
            "Parsed level"
        );

        Ok(Self {
            map,
            pacman,
            ghosts,
            pellets,
            power_pellets,
        })
    }
}
