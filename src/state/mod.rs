mod belief;
mod grid_belief;
mod level;
mod map;

pub use belief::{BeliefError, BeliefState};
pub use grid_belief::{FEAR_DURATION, GhostBelief, GridBeliefState, Observation};
pub use level::{CLASSIC_LEVEL, Level, LevelError};
pub use map::{Cell, Map};
