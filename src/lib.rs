pub mod config;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;
pub mod world;

// Re-export commonly used types for convenience
pub use infra::{Action, Position};
pub use planners::best_first::{Planner, PlannerConfig};
pub use state::{BeliefState, GridBeliefState, Map};
