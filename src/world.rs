//! Ground truth of a running game. The agent only ever sees it through
//! [`World::observe`].

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::infra::{AStar, Action, Position};
use crate::state::{FEAR_DURATION, Level, Map, Observation};

/// Chance that a threatening ghost follows the shortest path to Pac-Man
/// instead of wandering.
pub const DEFAULT_CHASE_PROBABILITY: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghost {
    pub position: Position,
    pub spawn: Position,
    pub fear: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Blocked(Action),
    PelletEaten(Position),
    PowerPelletEaten(Position),
    GhostEaten { ghost: usize, position: Position },
    PacmanCaught { ghost: usize, position: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldStatus {
    Running,
    Won,
    Lost,
}

pub struct World {
    map: Arc<Map>,
    pacman: Position,
    pacman_spawn: Position,
    ghosts: Vec<Ghost>,
    pellets: BTreeSet<Position>,
    power_pellets: BTreeSet<Position>,
    lives: u32,
    tick: u32,
    chase_probability: f64,
    rng: StdRng,
}

impl World {
    pub fn new(level: &Level, lives: u32, seed: u64) -> Self {
        Self {
            map: Arc::new(level.map.clone()),
            pacman: level.pacman,
            pacman_spawn: level.pacman,
            ghosts: level
                .ghosts
                .iter()
                .map(|spawn| Ghost {
                    position: *spawn,
                    spawn: *spawn,
                    fear: 0,
                })
                .collect(),
            pellets: level.pellets.clone(),
            power_pellets: level.power_pellets.clone(),
            lives,
            tick: 0,
            chase_probability: DEFAULT_CHASE_PROBABILITY,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_chase_probability(mut self, probability: f64) -> Self {
        self.chase_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn pacman(&self) -> Position {
        self.pacman
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn pellets(&self) -> &BTreeSet<Position> {
        &self.pellets
    }

    pub fn power_pellets(&self) -> &BTreeSet<Position> {
        &self.power_pellets
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn status(&self) -> WorldStatus {
        if self.lives == 0 {
            WorldStatus::Lost
        } else if self.pellets.is_empty() {
            WorldStatus::Won
        } else {
            WorldStatus::Running
        }
    }

    /// Advances one tick. `None` (or a move into a wall) keeps Pac-Man in
    /// place.
    pub fn step(&mut self, action: Option<Action>) -> Vec<TickEvent> {
        let mut events = Vec::new();
        self.tick += 1;

        for ghost in &mut self.ghosts {
            ghost.fear = ghost.fear.saturating_sub(1);
        }

        if let Some(action) = action {
            let target = self.pacman.step(action);
            if self.map.is_walkable(&target) {
                self.pacman = target;
            } else {
                events.push(TickEvent::Blocked(action));
            }
        }

        if self.pellets.remove(&self.pacman) {
            events.push(TickEvent::PelletEaten(self.pacman));
        }
        if self.power_pellets.remove(&self.pacman) {
            events.push(TickEvent::PowerPelletEaten(self.pacman));
            for ghost in &mut self.ghosts {
                ghost.fear = FEAR_DURATION;
            }
        }

        self.resolve_collisions(&mut events);
        for index in 0..self.ghosts.len() {
            let next = self.next_ghost_position(index);
            self.ghosts[index].position = next;
        }
        self.resolve_collisions(&mut events);

        events
    }

    /// What Pac-Man perceives: everything except ghosts out of sight.
    pub fn observe(&self) -> Observation {
        Observation {
            pacman: self.pacman,
            pellets: self.pellets.clone(),
            power_pellets: self.power_pellets.clone(),
            lives: self.lives,
            fear_timers: self.ghosts.iter().map(|ghost| ghost.fear).collect(),
            sightings: self
                .ghosts
                .iter()
                .map(|ghost| {
                    self.map
                        .line_of_sight(&self.pacman, &ghost.position)
                        .then_some(ghost.position)
                })
                .collect(),
        }
    }

    fn next_ghost_position(&mut self, index: usize) -> Position {
        let ghost = &self.ghosts[index];
        let chase = ghost.fear == 0 && self.rng.random_bool(self.chase_probability);
        if chase
            && let Some(path) = AStar::find_path(&self.map, ghost.position, self.pacman)
            && let Some(next) = path.get(1)
        {
            return *next;
        }

        let options: Vec<Position> = self.map.walkable_neighbors(&ghost.position).collect();
        options
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ghost.position)
    }

    fn resolve_collisions(&mut self, events: &mut Vec<TickEvent>) {
        for (index, ghost) in self.ghosts.iter_mut().enumerate() {
            if ghost.position != self.pacman {
                continue;
            }
            if ghost.fear > 0 {
                events.push(TickEvent::GhostEaten {
                    ghost: index,
                    position: ghost.position,
                });
                ghost.position = ghost.spawn;
                ghost.fear = 0;
            } else if self.lives > 0 {
                events.push(TickEvent::PacmanCaught {
                    ghost: index,
                    position: ghost.position,
                });
                self.lives -= 1;
                self.pacman = self.pacman_spawn;
            }
        }
    }

    /// Plain-text rendering, one glyph per cell.
    pub fn draw_ascii_map(&self) -> String {
        let bounds = self.map.bounds();
        let mut output = String::new();
        for row in bounds.min_row..=bounds.max_row {
            for col in bounds.min_col..=bounds.max_col {
                let pos = Position::new(row, col);
                let glyph = if pos == self.pacman {
                    'P'
                } else if let Some(ghost) = self.ghosts.iter().find(|g| g.position == pos) {
                    if ghost.fear > 0 { 'g' } else { 'G' }
                } else if self.map.is_wall(&pos) {
                    '#'
                } else if self.power_pellets.contains(&pos) {
                    '*'
                } else if self.pellets.contains(&pos) {
                    '.'
                } else {
                    ' '
                };
                output.push(glyph);
            }
            output.push('\n');
        }
        output
    }
}
