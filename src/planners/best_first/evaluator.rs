//! Hand-tuned desirability score of a belief state. Lower is better: the
//! frontier pops the smallest `g + h` first.

use std::collections::BTreeSet;

use crate::infra::{GRID_SIZE, Position};
use crate::state::{BeliefState, Cell};

/// Weights and thresholds of the heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicWeights {
    /// Per-step pull towards the nearest pellet in the normal phase.
    pub pellet: f64,
    /// Per-step pull towards the nearest pellet in the endgame.
    pub endgame_pellet: f64,
    /// At most this many pellets (and no power pellet) left means endgame.
    pub endgame_pellet_threshold: usize,
    pub power_pellet: f64,
    /// Cost per pellet still on the board in the normal phase. Must exceed
    /// `pellet * far_distance` so that eating never scores worse than the
    /// jump to the next nearest pellet.
    pub pellet_credit: f64,
    pub endgame_pellet_credit: f64,
    /// Cost per power pellet still on the board; same bound against
    /// `power_pellet * far_distance`.
    pub power_pellet_credit: f64,
    /// Distance reported when nothing matches; also the cap.
    pub far_distance: f64,
    /// Floor applied to every distance before it is used as a divisor.
    pub min_distance: f64,
    /// Repulsion numerator of a ghost that can kill Pac-Man.
    pub ghost_threat: f64,
    /// Threat multiplier once a single life is left.
    pub low_life_threat_multiplier: f64,
    /// Attraction per remaining fear tick of a frightened ghost.
    pub fear_chase: f64,
    pub survival_bonus: f64,
    pub death_penalty: f64,
    pub endgame_life_multiplier: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            pellet: 1.0,
            endgame_pellet: 10.0,
            endgame_pellet_threshold: 5,
            power_pellet: 10.0,
            pellet_credit: 60.0,
            endgame_pellet_credit: 600.0,
            power_pellet_credit: 600.0,
            far_distance: 50.0,
            min_distance: 0.5,
            ghost_threat: 100.0,
            low_life_threat_multiplier: 2.0,
            fear_chase: 10.0,
            survival_bonus: 10_000.0,
            death_penalty: 10_000.0,
            endgame_life_multiplier: 2.0,
        }
    }
}

/// How a ghost with several candidate cells is reduced to one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GhostEstimate {
    /// First candidate in row-major order. Optimistic and cheap.
    #[default]
    FirstCandidate,
    /// Candidate closest to Pac-Man (worst case for a threat).
    Nearest,
    /// First candidate Pac-Man could see along its row or column, else the
    /// first candidate.
    VisibleFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Normal,
    Endgame,
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    pub weights: HeuristicWeights,
    pub ghost_estimate: GhostEstimate,
}

impl Evaluator {
    pub fn new(weights: HeuristicWeights, ghost_estimate: GhostEstimate) -> Self {
        Self {
            weights,
            ghost_estimate,
        }
    }

    pub fn phase<B: BeliefState>(&self, belief: &B) -> Phase {
        if belief.power_pellet_count() == 0
            && belief.pellet_count() <= self.weights.endgame_pellet_threshold
        {
            Phase::Endgame
        } else {
            Phase::Normal
        }
    }

    pub fn evaluate<B: BeliefState>(&self, belief: &B) -> f64 {
        let w = &self.weights;
        let phase = self.phase(belief);
        let mut score = 0.0;

        let (pellet_weight, pellet_credit) = match phase {
            Phase::Endgame => (w.endgame_pellet, w.endgame_pellet_credit),
            Phase::Normal => (w.pellet, w.pellet_credit),
        };
        if belief.pellet_count() > 0 {
            score += pellet_weight * self.nearest_distance(belief, Cell::Pellet);
            score += pellet_credit * belief.pellet_count() as f64;
        }
        if belief.power_pellet_count() > 0 {
            score += w.power_pellet * self.nearest_distance(belief, Cell::PowerPellet);
            score += w.power_pellet_credit * belief.power_pellet_count() as f64;
        }

        for ghost in 0..belief.ghost_count() {
            let Some(distance) = self.ghost_distance(belief, ghost) else {
                continue;
            };
            score += self.ghost_weight(belief, ghost) / distance;
        }

        let life_multiplier = match phase {
            Phase::Endgame => w.endgame_life_multiplier,
            Phase::Normal => 1.0,
        };
        score += match belief.lives() {
            0 => w.death_penalty * life_multiplier,
            lives => -w.survival_bonus * life_multiplier * f64::from(lives),
        };

        score
    }

    /// Manhattan distance from Pac-Man to the closest cell holding `cell`,
    /// capped at (and defaulting to) `far_distance`, floored at
    /// `min_distance`.
    pub fn nearest_distance<B: BeliefState>(&self, belief: &B, cell: Cell) -> f64 {
        let pacman = belief.pacman_position();
        let mut nearest = self.weights.far_distance;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if belief.cell_at(row, col) == cell {
                    let distance = f64::from(pacman.distance(&Position::new(row, col)));
                    nearest = nearest.min(distance);
                }
            }
        }
        nearest.max(self.weights.min_distance)
    }

    pub fn ghost_distance<B: BeliefState>(&self, belief: &B, ghost: usize) -> Option<f64> {
        let pacman = belief.pacman_position();
        let position = self.representative_position(belief, belief.ghost_positions(ghost))?;
        Some(f64::from(pacman.distance(&position)).max(self.weights.min_distance))
    }

    /// Single point standing in for a ghost's candidate set.
    pub fn representative_position<B: BeliefState>(
        &self,
        belief: &B,
        candidates: &BTreeSet<Position>,
    ) -> Option<Position> {
        let pacman = belief.pacman_position();
        match self.ghost_estimate {
            GhostEstimate::FirstCandidate => candidates.first().copied(),
            GhostEstimate::Nearest => candidates
                .iter()
                .min_by_key(|pos| (pacman.distance(pos), **pos))
                .copied(),
            GhostEstimate::VisibleFirst => candidates
                .iter()
                .find(|pos| in_sight(belief, pacman, **pos))
                .or_else(|| candidates.first())
                .copied(),
        }
    }

    fn ghost_weight<B: BeliefState>(&self, belief: &B, ghost: usize) -> f64 {
        let w = &self.weights;
        match belief.fear_timer(ghost) {
            0 if belief.lives() == 1 => w.ghost_threat * w.low_life_threat_multiplier,
            0 => w.ghost_threat,
            fear => -w.fear_chase * f64::from(fear),
        }
    }
}

/// Same row or column with no wall strictly in between.
fn in_sight<B: BeliefState>(belief: &B, from: Position, to: Position) -> bool {
    let between: Vec<Position> = if from.row == to.row {
        let (lo, hi) = (from.col.min(to.col), from.col.max(to.col));
        (lo + 1..hi).map(|col| Position::new(from.row, col)).collect()
    } else if from.col == to.col {
        let (lo, hi) = (from.row.min(to.row), from.row.max(to.row));
        (lo + 1..hi).map(|row| Position::new(row, from.col)).collect()
    } else {
        return false;
    };
    between
        .iter()
        .all(|pos| belief.cell_at(pos.row, pos.col) != Cell::Wall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{GhostBelief, GridBeliefState, Map};
    use std::sync::Arc;

    fn open_state(pacman: Position) -> GridBeliefState {
        GridBeliefState::new(Arc::new(Map::open()), pacman, 3)
    }

    #[test]
    fn test_nearest_distance_defaults_to_far_sentinel() {
        let evaluator = Evaluator::default();
        let state = open_state(Position::new(1, 1));
        assert_eq!(evaluator.nearest_distance(&state, Cell::Pellet), 50.0);
        assert_eq!(evaluator.nearest_distance(&state, Cell::PowerPellet), 50.0);
    }

    #[test]
    fn test_nearest_distance_never_increases_as_closer_pellets_appear() {
        let evaluator = Evaluator::default();
        let pacman = Position::new(12, 12);
        let pellets = [
            Position::new(0, 0),
            Position::new(20, 12),
            Position::new(12, 15),
            Position::new(11, 12),
        ];

        let mut state = open_state(pacman);
        let mut previous = evaluator.nearest_distance(&state, Cell::Pellet);
        for pellet in pellets {
            state = state.with_pellets([pellet]);
            let current = evaluator.nearest_distance(&state, Cell::Pellet);
            assert!(current <= previous, "{current} > {previous}");
            previous = current;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn test_nearest_distance_is_floored_and_per_marker() {
        let evaluator = Evaluator::default();
        // A pellet under Pac-Man never happens in play, but must not yield 0.
        let state = open_state(Position::new(3, 3))
            .with_pellets([Position::new(3, 3)])
            .with_power_pellets([Position::new(3, 7)]);
        assert_eq!(evaluator.nearest_distance(&state, Cell::Pellet), 0.5);
        assert_eq!(evaluator.nearest_distance(&state, Cell::PowerPellet), 4.0);
    }

    #[test]
    fn test_representative_position_strategies() {
        let state = open_state(Position::new(10, 10));
        let candidates = BTreeSet::from([Position::new(2, 10), Position::new(10, 12)]);

        let first = Evaluator::default();
        assert_eq!(
            first.representative_position(&state, &candidates),
            Some(Position::new(2, 10))
        );

        let nearest = Evaluator::new(HeuristicWeights::default(), GhostEstimate::Nearest);
        assert_eq!(
            nearest.representative_position(&state, &candidates),
            Some(Position::new(10, 12))
        );
        assert_eq!(nearest.representative_position(&state, &BTreeSet::new()), None);
    }

    #[test]
    fn test_visible_first_prefers_candidates_in_sight() {
        let evaluator = Evaluator::new(HeuristicWeights::default(), GhostEstimate::VisibleFirst);
        let candidates = BTreeSet::from([
            Position::new(2, 3),
            Position::new(8, 10),
            Position::new(10, 20),
        ]);

        let open = open_state(Position::new(10, 10));
        assert_eq!(
            evaluator.representative_position(&open, &candidates),
            Some(Position::new(8, 10))
        );

        let mut map = Map::open();
        map.add_wall(Position::new(9, 10));
        let walled = GridBeliefState::new(Arc::new(map), Position::new(10, 10), 3);
        assert_eq!(
            evaluator.representative_position(&walled, &candidates),
            Some(Position::new(10, 20))
        );

        let hidden = BTreeSet::from([Position::new(2, 3), Position::new(4, 7)]);
        assert_eq!(
            evaluator.representative_position(&open, &hidden),
            Some(Position::new(2, 3))
        );

        let ghost = open.clone().with_ghosts([GhostBelief {
            candidates,
            fear: 0,
            spawn: Position::new(12, 12),
            eaten: false,
        }]);
        assert_eq!(evaluator.ghost_distance(&ghost, 0), Some(2.0));
        assert_eq!(Evaluator::default().ghost_distance(&ghost, 0), Some(15.0));
    }

    #[test]
    fn test_ghost_terms_repel_or_attract() {
        let evaluator = Evaluator::default();
        let base = open_state(Position::new(1, 1)).with_pellets([Position::new(20, 20)]);
        let baseline = evaluator.evaluate(&base);

        let threat = base.clone().with_ghost(Position::new(1, 3), 0);
        assert_eq!(evaluator.evaluate(&threat) - baseline, 50.0);

        let feared = base.clone().with_ghost(Position::new(1, 3), 6);
        assert_eq!(evaluator.evaluate(&feared) - baseline, -30.0);
    }

    #[test]
    fn test_single_life_doubles_the_threat() {
        let evaluator = Evaluator::default();
        let pellets = [Position::new(20, 20)];
        let with_lives = |lives: u32| {
            GridBeliefState::new(Arc::new(Map::open()), Position::new(1, 1), lives)
                .with_pellets(pellets)
        };

        let calm = evaluator.evaluate(&with_lives(1));
        let hunted = evaluator.evaluate(&with_lives(1).with_ghost(Position::new(1, 5), 0));
        assert_eq!(hunted - calm, 50.0);
    }

    #[test]
    fn test_life_term_dominates() {
        let evaluator = Evaluator::default();
        let alive = open_state(Position::new(1, 1)).with_power_pellets([Position::new(5, 5)]);
        let dead = GridBeliefState::new(Arc::new(Map::open()), Position::new(1, 1), 0)
            .with_power_pellets([Position::new(5, 5)]);

        assert!(evaluator.evaluate(&dead) > evaluator.evaluate(&alive) + 30_000.0);
        assert_eq!(evaluator.phase(&alive), Phase::Normal);
    }

    #[test]
    fn test_endgame_raises_pellet_weight_and_life_stakes() {
        let evaluator = Evaluator::default();
        let endgame = open_state(Position::new(1, 1)).with_pellets([Position::new(1, 4)]);
        assert_eq!(evaluator.phase(&endgame), Phase::Endgame);
        assert_eq!(
            evaluator.evaluate(&endgame),
            10.0 * 3.0 + 600.0 - 10_000.0 * 2.0 * 3.0
        );

        let crowded = endgame
            .clone()
            .with_pellets((10..16).map(|col| Position::new(20, col)));
        assert_eq!(evaluator.phase(&crowded), Phase::Normal);
        assert_eq!(evaluator.evaluate(&crowded), 3.0 + 60.0 * 7.0 - 10_000.0 * 3.0);
    }

    #[test]
    fn test_eating_beats_staying_next_to_food() {
        let evaluator = Evaluator::default();
        let far = Position::new(20, 20);

        // Normal phase: a power pellet far away keeps the phase from flipping.
        let before = open_state(Position::new(5, 5))
            .with_pellets([Position::new(5, 6), far])
            .with_power_pellets([Position::new(24, 0)]);
        let mut eaten = open_state(Position::new(5, 6))
            .with_pellets([far])
            .with_power_pellets([Position::new(24, 0)]);
        assert!(evaluator.evaluate(&eaten) < evaluator.evaluate(&before));

        // Endgame: same comparison with the heavier weights.
        let before = open_state(Position::new(5, 5)).with_pellets([Position::new(5, 6), far]);
        eaten = open_state(Position::new(5, 6)).with_pellets([far]);
        assert_eq!(evaluator.phase(&before), Phase::Endgame);
        assert!(evaluator.evaluate(&eaten) < evaluator.evaluate(&before));

        let before = open_state(Position::new(5, 5))
            .with_pellets([far])
            .with_power_pellets([Position::new(5, 6), Position::new(20, 21)]);
        let eaten = open_state(Position::new(5, 6))
            .with_pellets([far])
            .with_power_pellets([Position::new(20, 21)]);
        assert!(evaluator.evaluate(&eaten) < evaluator.evaluate(&before));
    }

    #[test]
    fn test_score_ignores_ghost_enumeration_order() {
        let evaluator = Evaluator::default();
        let a = GhostBelief::at(Position::new(4, 9), 0);
        let b = GhostBelief {
            candidates: BTreeSet::from([Position::new(8, 2), Position::new(9, 3)]),
            fear: 7,
            spawn: Position::new(12, 12),
            eaten: false,
        };
        let base = open_state(Position::new(6, 6))
            .with_pellets([Position::new(0, 24)])
            .with_power_pellets([Position::new(24, 0)]);

        let forward = base.clone().with_ghosts([a.clone(), b.clone()]);
        let reversed = base.with_ghosts([b, a]);
        let difference = evaluator.evaluate(&forward) - evaluator.evaluate(&reversed);
        assert!(difference.abs() < 1e-9);
    }

    #[test]
    fn test_empty_candidate_set_is_skipped() {
        let evaluator = Evaluator::default();
        let base = open_state(Position::new(1, 1)).with_pellets([Position::new(20, 20)]);
        let unknown = base.clone().with_ghosts([GhostBelief {
            candidates: BTreeSet::new(),
            fear: 0,
            spawn: Position::new(12, 12),
            eaten: false,
        }]);
        assert_eq!(evaluator.ghost_distance(&unknown, 0), None);
        assert_eq!(evaluator.evaluate(&unknown), evaluator.evaluate(&base));
    }
}
