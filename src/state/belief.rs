use std::collections::BTreeSet;
use std::hash::Hash;

use crate::infra::{Bounds, GRID_SIZE, Position};
use crate::planners::best_first::Plan;
use crate::state::Cell;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BeliefError {
    #[error("pacman position {0} is outside the grid")]
    PacmanOutOfBounds(Position),
    #[error("pacman position {0} is inside a wall")]
    PacmanInWall(Position),
    #[error("ghost {ghost} has no candidate position")]
    EmptyGhostBelief { ghost: usize },
    #[error("ghost {ghost} candidate {position} is outside the grid")]
    GhostOutOfBounds { ghost: usize, position: Position },
    #[error("belief reports {reported} pellets but the grid holds {found}")]
    PelletCountMismatch { reported: usize, found: usize },
    #[error("belief reports {reported} power pellets but the grid holds {found}")]
    PowerPelletCountMismatch { reported: usize, found: usize },
}

/// What the agent believes about the world at one instant. Ghost positions
/// may be uncertain: each ghost answers a set of candidate cells.
///
/// Values are immutable once built; equality and hashing must cover
/// everything that distinguishes two worlds so that the planner can suppress
/// duplicates.
pub trait BeliefState: Clone + Eq + Hash + Sized {
    /// Every action-labelled successor. Actions with identical consequences
    /// may share one association.
    fn expand(&self) -> Plan<Self>;

    fn cell_at(&self, row: i32, col: i32) -> Cell;

    fn ghost_count(&self) -> usize;

    /// Candidate cells of one ghost, sorted and deduplicated.
    fn ghost_positions(&self, ghost: usize) -> &BTreeSet<Position>;

    fn pellet_count(&self) -> usize;

    fn power_pellet_count(&self) -> usize;

    fn fear_timer(&self, ghost: usize) -> u32;

    fn lives(&self) -> u32;

    fn pacman_position(&self) -> Position;

    /// Accumulated path cost of this state relative to `reference`.
    fn relative_order(&self, reference: &Self) -> i64;

    /// Structural checks done once at the planner boundary.
    fn validate(&self) -> Result<(), BeliefError> {
        let bounds = Bounds::grid();
        let pacman = self.pacman_position();
        if !bounds.contains(&pacman) {
            return Err(BeliefError::PacmanOutOfBounds(pacman));
        }
        if self.cell_at(pacman.row, pacman.col) == Cell::Wall {
            return Err(BeliefError::PacmanInWall(pacman));
        }

        for ghost in 0..self.ghost_count() {
            let candidates = self.ghost_positions(ghost);
            if candidates.is_empty() {
                return Err(BeliefError::EmptyGhostBelief { ghost });
            }
            if let Some(position) = candidates.iter().find(|pos| !bounds.contains(pos)) {
                return Err(BeliefError::GhostOutOfBounds {
                    ghost,
                    position: *position,
                });
            }
        }

        let mut pellets = 0;
        let mut power_pellets = 0;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                match self.cell_at(row, col) {
                    Cell::Pellet => pellets += 1,
                    Cell::PowerPellet => power_pellets += 1,
                    Cell::Empty | Cell::Wall => {}
                }
            }
        }
        if pellets != self.pellet_count() {
            return Err(BeliefError::PelletCountMismatch {
                reported: self.pellet_count(),
                found: pellets,
            });
        }
        if power_pellets != self.power_pellet_count() {
            return Err(BeliefError::PowerPelletCountMismatch {
                reported: self.power_pellet_count(),
                found: power_pellets,
            });
        }

        Ok(())
    }
}
