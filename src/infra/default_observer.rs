use std::io::{self, Write};

use tracing::info;

use crate::game::GameSummary;
use crate::infra::{Action, GameObserver};
use crate::state::{BeliefState, GridBeliefState};
use crate::world::{TickEvent, World};

/// Logs the game and prints the maze every tick.
pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_game_start(&mut self, seed: u64, world: &World) {
        info!("Game started");
        info!("- seed: {}", seed);
        info!("- ghosts: {}", world.ghosts().len());
        info!(
            "- pellets: {}, power pellets: {}",
            world.pellets().len(),
            world.power_pellets().len()
        );
        info!("- lives: {}", world.lives());
    }

    fn on_state_update(&mut self, world: &World, belief: &GridBeliefState) {
        info!(
            "tick: {}, pos: {}, lives: {}, pellets left: {}",
            world.tick(),
            world.pacman(),
            world.lives(),
            world.pellets().len(),
        );

        let map = world.draw_ascii_map();
        let _ = writeln!(io::stdout(), "{}", map);

        let candidates: Vec<usize> = (0..belief.ghost_count())
            .map(|ghost| belief.ghost_positions(ghost).len())
            .collect();
        let _ = writeln!(io::stdout(), "Ghost candidates: {:?}", candidates);
    }

    fn on_action_selected(&mut self, _tick: u32, action: Option<Action>) {
        match action {
            Some(action) => info!("action: {}", action),
            None => info!("action: HOLD"),
        }
    }

    fn on_tick_events(&mut self, _tick: u32, events: &[TickEvent]) {
        for event in events {
            match event {
                TickEvent::PowerPelletEaten(pos) => info!("Power pellet eaten at {}", pos),
                TickEvent::GhostEaten { ghost, position } => {
                    info!("Ghost {} eaten at {}", ghost, position)
                }
                TickEvent::PacmanCaught { ghost, position } => {
                    info!("Caught by ghost {} at {}", ghost, position)
                }
                TickEvent::Blocked(action) => info!("Move {} blocked by a wall", action),
                TickEvent::PelletEaten(_) => {}
            }
        }
    }

    fn on_game_finished(&mut self, summary: &GameSummary) {
        info!("\nGame finished with status: {:?}", summary.status);
        info!("Final tick: {}", summary.ticks);
        info!(
            "Lives: {}, pellets left: {}, holds: {}",
            summary.lives, summary.pellets_left, summary.holds
        );
    }
}
