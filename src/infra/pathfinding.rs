use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::infra::Position;
use crate::state::Map;

const MAX_EXPANSIONS: usize = 5000;

#[derive(Clone, Eq, PartialEq)]
struct Node {
    pos: Position,
    f_score: i32,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap; ties broken on position to stay deterministic
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct AStar;

impl AStar {
    /// Shortest path over walkable cells, start and goal included.
    pub fn find_path(map: &Map, start: Position, goal: Position) -> Option<Vec<Position>> {
        if start == goal {
            return Some(vec![goal]);
        }
        if !map.is_walkable(&goal) {
            return None;
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut g_score: HashMap<Position, i32> = HashMap::new();
        let mut closed_set: HashSet<Position> = HashSet::new();

        g_score.insert(start, 0);
        open_set.push(Node {
            pos: start,
            f_score: heuristic(start, goal),
        });

        let mut expansions = 0;
        while let Some(Node { pos: current, .. }) = open_set.pop() {
            if current == goal {
                return Some(reconstruct_path(&came_from, current));
            }
            if !closed_set.insert(current) {
                continue;
            }

            expansions += 1;
            if expansions > MAX_EXPANSIONS {
                tracing::warn!(from = %start, to = %goal, "Path search gave up");
                return None;
            }

            let current_g_score = g_score.get(&current).copied().unwrap_or(0);
            for neighbor in map.walkable_neighbors(&current) {
                if closed_set.contains(&neighbor) {
                    continue;
                }

                let tentative_g = current_g_score + 1;
                if tentative_g < g_score.get(&neighbor).copied().unwrap_or(i32::MAX) {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative_g);
                    open_set.push(Node {
                        pos: neighbor,
                        f_score: tentative_g + heuristic(neighbor, goal),
                    });
                }
            }
        }

        None
    }
}

fn heuristic(a: Position, b: Position) -> i32 {
    a.distance(&b)
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
