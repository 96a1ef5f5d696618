mod composite_observer;
mod default_observer;
mod game_observer;
mod pathfinding;
mod replay_observer;
mod types;

pub use composite_observer::CompositeObserver;
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use pathfinding::AStar;
pub use replay_observer::ReplayObserver;
pub use types::{Action, Bounds, GRID_SIZE, Position};
