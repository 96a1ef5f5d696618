use crate::game::GameSummary;
use crate::infra::{Action, GameObserver};
use crate::state::GridBeliefState;
use crate::world::{TickEvent, World};

/// Fans every callback out to several observers, in order.
pub struct CompositeObserver {
    observers: Vec<Box<dyn GameObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn GameObserver>>) -> Self {
        Self { observers }
    }
}

impl GameObserver for CompositeObserver {
    fn on_game_start(&mut self, seed: u64, world: &World) {
        for observer in &mut self.observers {
            observer.on_game_start(seed, world);
        }
    }

    fn on_state_update(&mut self, world: &World, belief: &GridBeliefState) {
        for observer in &mut self.observers {
            observer.on_state_update(world, belief);
        }
    }

    fn on_action_selected(&mut self, tick: u32, action: Option<Action>) {
        for observer in &mut self.observers {
            observer.on_action_selected(tick, action);
        }
    }

    fn on_tick_events(&mut self, tick: u32, events: &[TickEvent]) {
        for observer in &mut self.observers {
            observer.on_tick_events(tick, events);
        }
    }

    fn on_game_finished(&mut self, summary: &GameSummary) {
        for observer in &mut self.observers {
            observer.on_game_finished(summary);
        }
    }
}
