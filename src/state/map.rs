use std::collections::HashMap;

use crate::infra::{Bounds, GRID_SIZE, Position};

/// Content marker of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
    Pellet,
    PowerPellet,
}

impl Cell {
    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Pellet => '.',
            Cell::PowerPellet => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Cell> {
        match glyph {
            ' ' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Pellet),
            '*' => Some(Cell::PowerPellet),
            _ => None,
        }
    }
}

/// Static maze layout. Only walls live here; pellets are part of the
/// (mutable) game state.
#[derive(Clone, Debug)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    tiles: HashMap<Position, Cell>,
}

impl Map {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: HashMap::new(),
        }
    }

    /// Full-size map without any walls.
    pub fn open() -> Self {
        Self::new(GRID_SIZE, GRID_SIZE)
    }

    pub fn get(&self, pos: &Position) -> Option<&Cell> {
        self.tiles.get(pos)
    }

    pub fn add_wall(&mut self, pos: Position) {
        self.tiles.insert(pos, Cell::Wall);
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(0, self.height - 1, 0, self.width - 1)
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        self.bounds().contains(pos)
    }

    pub fn is_wall(&self, pos: &Position) -> bool {
        matches!(self.get(pos), Some(Cell::Wall))
    }

    pub fn is_walkable(&self, pos: &Position) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }

    pub fn walkable_neighbors(&self, pos: &Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors()
            .into_iter()
            .filter(move |next| self.is_walkable(next))
    }

    /// Whether `to` can be seen from `from`: same row or column and no wall
    /// strictly in between.
    pub fn line_of_sight(&self, from: &Position, to: &Position) -> bool {
        if from.row == to.row {
            let (lo, hi) = ordered(from.col, to.col);
            (lo + 1..hi).all(|col| !self.is_wall(&Position::new(from.row, col)))
        } else if from.col == to.col {
            let (lo, hi) = ordered(from.row, to.row);
            (lo + 1..hi).all(|row| !self.is_wall(&Position::new(row, from.col)))
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_block_walking_and_sight() {
        let mut map = Map::open();
        map.add_wall(Position::new(3, 3));

        assert!(!map.is_walkable(&Position::new(3, 3)));
        assert!(!map.is_walkable(&Position::new(-1, 0)));
        assert!(map.is_walkable(&Position::new(3, 4)));

        assert!(map.line_of_sight(&Position::new(3, 0), &Position::new(3, 2)));
        assert!(!map.line_of_sight(&Position::new(3, 0), &Position::new(3, 6)));
        assert!(!map.line_of_sight(&Position::new(0, 3), &Position::new(6, 3)));
        assert!(!map.line_of_sight(&Position::new(0, 0), &Position::new(1, 1)));
    }

    #[test]
    fn test_walkable_neighbors_skip_edges() {
        let map = Map::open();
        let corner: Vec<Position> = map.walkable_neighbors(&Position::new(0, 0)).collect();
        assert_eq!(corner, vec![Position::new(1, 0), Position::new(0, 1)]);
    }

    #[test]
    fn test_glyph_roundtrip_for_known_cells() {
        for cell in [Cell::Empty, Cell::Wall, Cell::Pellet, Cell::PowerPellet] {
            assert_eq!(Cell::from_glyph(cell.glyph()), Some(cell));
        }
        assert_eq!(Cell::from_glyph('x'), None);
    }
}
