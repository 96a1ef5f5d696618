use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::infra::{Action, Position};
use crate::planners::best_first::{Outcome, Plan};
use crate::state::{BeliefState, Cell, Level, Map};

/// Ticks a ghost stays frightened after Pac-Man eats a power pellet.
pub const FEAR_DURATION: u32 = 20;

/// What the agent knows about one ghost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GhostBelief {
    pub candidates: BTreeSet<Position>,
    pub fear: u32,
    pub spawn: Position,
    /// Eaten this tick; back at `spawn` on the next one.
    pub eaten: bool,
}

impl GhostBelief {
    pub fn at(position: Position, fear: u32) -> Self {
        Self {
            candidates: BTreeSet::from([position]),
            fear,
            spawn: position,
            eaten: false,
        }
    }

    fn respawn_if_eaten(&mut self) -> bool {
        if !self.eaten {
            return false;
        }
        self.candidates = BTreeSet::from([self.spawn]);
        self.fear = 0;
        self.eaten = false;
        true
    }
}

/// Everything Pac-Man perceives after a tick, as produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub pacman: Position,
    pub pellets: BTreeSet<Position>,
    pub power_pellets: BTreeSet<Position>,
    pub lives: u32,
    pub fear_timers: Vec<u32>,
    /// Per ghost: where it was seen, if it was in line of sight.
    pub sightings: Vec<Option<Position>>,
}

/// Belief state over a static maze. Ghosts move one cell per tick in any
/// walkable direction; Pac-Man sees along rows and columns until a wall.
#[derive(Debug, Clone)]
pub struct GridBeliefState {
    map: Arc<Map>,
    pellets: BTreeSet<Position>,
    power_pellets: BTreeSet<Position>,
    pacman: Position,
    pacman_spawn: Position,
    ghosts: Vec<GhostBelief>,
    lives: u32,
    steps: u32,
}

impl GridBeliefState {
    pub fn new(map: Arc<Map>, pacman: Position, lives: u32) -> Self {
        Self {
            map,
            pellets: BTreeSet::new(),
            power_pellets: BTreeSet::new(),
            pacman,
            pacman_spawn: pacman,
            ghosts: Vec::new(),
            lives,
            steps: 0,
        }
    }

    pub fn from_level(level: &Level, lives: u32) -> Self {
        Self::new(Arc::new(level.map.clone()), level.pacman, lives)
            .with_pellets(level.pellets.iter().copied())
            .with_power_pellets(level.power_pellets.iter().copied())
            .with_ghosts(level.ghosts.iter().map(|spawn| GhostBelief::at(*spawn, 0)))
    }

    pub fn with_pellets(mut self, pellets: impl IntoIterator<Item = Position>) -> Self {
        self.pellets.extend(pellets);
        self
    }

    pub fn with_power_pellets(mut self, power_pellets: impl IntoIterator<Item = Position>) -> Self {
        self.power_pellets.extend(power_pellets);
        self
    }

    pub fn with_ghost(self, position: Position, fear: u32) -> Self {
        self.with_ghosts([GhostBelief::at(position, fear)])
    }

    pub fn with_ghosts(mut self, ghosts: impl IntoIterator<Item = GhostBelief>) -> Self {
        self.ghosts.extend(ghosts);
        self
    }

    pub fn pellets(&self) -> &BTreeSet<Position> {
        &self.pellets
    }

    pub fn power_pellets(&self) -> &BTreeSet<Position> {
        &self.power_pellets
    }

    pub fn ghosts(&self) -> &[GhostBelief] {
        &self.ghosts
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Folds one tick of perception into the belief.
    pub fn observe(&self, observation: &Observation) -> Self {
        let mut next = self.clone();
        next.steps += 1;
        next.pacman = observation.pacman;
        next.pellets = observation.pellets.clone();
        next.power_pellets = observation.power_pellets.clone();
        next.lives = observation.lives;

        for (index, ghost) in next.ghosts.iter_mut().enumerate() {
            ghost.eaten = false;
            ghost.fear = observation.fear_timers.get(index).copied().unwrap_or(0);
            ghost.candidates = match observation.sightings.get(index).copied().flatten() {
                Some(seen) => BTreeSet::from([seen]),
                None => {
                    let unseen: BTreeSet<Position> = spread(&self.map, &ghost.candidates)
                        .into_iter()
                        .filter(|pos| !self.map.line_of_sight(&observation.pacman, pos))
                        .collect();
                    if unseen.is_empty() {
                        BTreeSet::from([ghost.spawn])
                    } else {
                        unseen
                    }
                }
            };
        }

        tracing::trace!(
            steps = next.steps,
            pacman = %next.pacman,
            candidates = ?next.ghosts.iter().map(|g| g.candidates.len()).collect::<Vec<_>>(),
            "Updated belief"
        );
        next
    }

    /// All outcomes of Pac-Man stepping onto `target`.
    fn successors(&self, target: Position) -> Vec<Self> {
        let mut next = self.clone();
        next.steps += 1;

        let respawned: Vec<bool> = next
            .ghosts
            .iter_mut()
            .map(GhostBelief::respawn_if_eaten)
            .collect();
        for ghost in &mut next.ghosts {
            ghost.fear = ghost.fear.saturating_sub(1);
        }

        next.pacman = target;
        next.pellets.remove(&target);
        if next.power_pellets.remove(&target) {
            for ghost in &mut next.ghosts {
                ghost.fear = FEAR_DURATION;
            }
        }

        for (ghost, respawned) in next.ghosts.iter_mut().zip(respawned) {
            if !respawned {
                ghost.candidates = spread(&self.map, &ghost.candidates);
            }
        }

        let mut outcomes = vec![next];
        for index in 0..self.ghosts.len() {
            outcomes = outcomes
                .into_iter()
                .flat_map(|state| state.split_on_sighting(index))
                .collect();
        }

        let mut distinct: Vec<Self> = Vec::with_capacity(outcomes.len());
        for state in outcomes {
            if !distinct.contains(&state) {
                distinct.push(state);
            }
        }
        distinct
    }

    /// One outcome per candidate Pac-Man would see, plus one for "not seen".
    fn split_on_sighting(self, index: usize) -> Vec<Self> {
        let candidates = &self.ghosts[index].candidates;
        let (visible, hidden): (Vec<Position>, Vec<Position>) = candidates
            .iter()
            .copied()
            .partition(|pos| self.map.line_of_sight(&self.pacman, pos));

        if visible.is_empty() {
            return vec![self];
        }

        let mut outcomes = Vec::with_capacity(visible.len() + 1);
        for seen in visible {
            let mut state = self.clone();
            state.ghosts[index].candidates = BTreeSet::from([seen]);
            if seen == state.pacman {
                state.collide(index);
            }
            outcomes.push(state);
        }
        if !hidden.is_empty() {
            let mut state = self;
            state.ghosts[index].candidates = hidden.into_iter().collect();
            outcomes.push(state);
        }
        outcomes
    }

    fn collide(&mut self, index: usize) {
        let ghost = &mut self.ghosts[index];
        if ghost.fear > 0 {
            ghost.eaten = true;
        } else {
            self.lives = self.lives.saturating_sub(1);
            self.pacman = self.pacman_spawn;
        }
    }
}

/// Every cell a ghost could occupy one tick later.
fn spread(map: &Map, candidates: &BTreeSet<Position>) -> BTreeSet<Position> {
    let mut reachable = candidates.clone();
    for pos in candidates {
        reachable.extend(map.walkable_neighbors(pos));
    }
    reachable
}

impl PartialEq for GridBeliefState {
    fn eq(&self, other: &Self) -> bool {
        self.pacman == other.pacman
            && self.lives == other.lives
            && self.pacman_spawn == other.pacman_spawn
            && self.pellets == other.pellets
            && self.power_pellets == other.power_pellets
            && self.ghosts == other.ghosts
    }
}

impl Eq for GridBeliefState {}

impl Hash for GridBeliefState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pacman.hash(state);
        self.lives.hash(state);
        self.pacman_spawn.hash(state);
        self.pellets.hash(state);
        self.power_pellets.hash(state);
        self.ghosts.hash(state);
    }
}

impl BeliefState for GridBeliefState {
    fn expand(&self) -> Plan<Self> {
        let mut grouped: Vec<(Vec<Action>, Vec<Self>)> = Vec::new();
        for action in Action::ALL {
            let target = self.pacman.step(action);
            if !self.map.is_walkable(&target) {
                continue;
            }

            let outcomes = self.successors(target);
            match grouped.iter_mut().find(|(_, existing)| *existing == outcomes) {
                Some((actions, _)) => actions.push(action),
                None => grouped.push((vec![action], outcomes)),
            }
        }

        let mut plan = Plan::new();
        for (actions, states) in grouped {
            if let Some(outcome) = Outcome::new(states) {
                plan.record(outcome, actions);
            }
        }
        plan
    }

    fn cell_at(&self, row: i32, col: i32) -> Cell {
        let pos = Position::new(row, col);
        if !self.map.in_bounds(&pos) || self.map.is_wall(&pos) {
            Cell::Wall
        } else if self.power_pellets.contains(&pos) {
            Cell::PowerPellet
        } else if self.pellets.contains(&pos) {
            Cell::Pellet
        } else {
            Cell::Empty
        }
    }

    fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    fn ghost_positions(&self, ghost: usize) -> &BTreeSet<Position> {
        &self.ghosts[ghost].candidates
    }

    fn pellet_count(&self) -> usize {
        self.pellets.len()
    }

    fn power_pellet_count(&self) -> usize {
        self.power_pellets.len()
    }

    fn fear_timer(&self, ghost: usize) -> u32 {
        self.ghosts[ghost].fear
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn pacman_position(&self) -> Position {
        self.pacman
    }

    fn relative_order(&self, reference: &Self) -> i64 {
        i64::from(self.steps) - i64::from(reference.steps)
    }
}
