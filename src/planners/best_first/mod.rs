//! Best-first search over belief states: pops the state with the lowest
//! path cost plus heuristic score, a couple of times per tick, and maps the
//! last popped state back to the move that leads to it.

mod evaluator;
mod frontier;
mod plan;
mod planner;

pub use evaluator::{Evaluator, GhostEstimate, HeuristicWeights, Phase};
pub use frontier::Frontier;
pub use plan::{Outcome, Plan, PlanEntry};
pub use planner::{ExploredScope, Planner, PlannerConfig, PlannerError, SearchReport, StopReason};
