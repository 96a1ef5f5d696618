use crate::game::GameSummary;
use crate::infra::Action;
use crate::state::GridBeliefState;
use crate::world::{TickEvent, World};

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called once before the first tick
    fn on_game_start(&mut self, seed: u64, world: &World);

    /// Called at the start of every tick, before planning
    fn on_state_update(&mut self, world: &World, belief: &GridBeliefState);

    /// Called with the planner's choice; `None` means Pac-Man holds position
    fn on_action_selected(&mut self, tick: u32, action: Option<Action>);

    /// Called with what happened while the world advanced
    fn on_tick_events(&mut self, _tick: u32, _events: &[TickEvent]) {}

    /// Called when the game finishes
    fn on_game_finished(&mut self, summary: &GameSummary);
}
