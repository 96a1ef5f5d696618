use std::time::{Duration, Instant};

use crate::infra::GameObserver;
use crate::planners::best_first::{Planner, PlannerError};
use crate::state::{GridBeliefState, Level};
use crate::world::{DEFAULT_CHASE_PROBABILITY, World, WorldStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Won,
    Lost,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub status: GameStatus,
    pub ticks: u32,
    pub lives: u32,
    pub pellets_left: usize,
    /// Ticks on which the planner had no move to offer.
    pub holds: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("planner failed: {0}")]
    Planner(#[from] PlannerError),
}

#[derive(Debug, Clone)]
pub struct GameSettings {
    pub seed: u64,
    pub lives: u32,
    pub max_ticks: u32,
    /// Pause between ticks; zero runs as fast as possible.
    pub tick_ms: u64,
    pub chase_probability: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            lives: 3,
            max_ticks: 1000,
            tick_ms: 0,
            chase_probability: DEFAULT_CHASE_PROBABILITY,
        }
    }
}

pub struct Game {
    settings: GameSettings,
    world: World,
    belief: GridBeliefState,
    planner: Planner<GridBeliefState>,
    observer: Box<dyn GameObserver>,
}

impl Game {
    pub fn new(
        level: &Level,
        settings: GameSettings,
        planner: Planner<GridBeliefState>,
        observer: impl GameObserver + 'static,
    ) -> Self {
        let world = World::new(level, settings.lives, settings.seed)
            .with_chase_probability(settings.chase_probability);
        let belief = GridBeliefState::from_level(level, settings.lives);
        Self {
            settings,
            world,
            belief,
            planner,
            observer: Box::new(observer),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn belief(&self) -> &GridBeliefState {
        &self.belief
    }

    pub async fn run(&mut self) -> Result<GameSummary, GameError> {
        self.observer.on_game_start(self.settings.seed, &self.world);

        let mut interval = (self.settings.tick_ms > 0)
            .then(|| tokio::time::interval(Duration::from_millis(self.settings.tick_ms)));
        let mut holds = 0;

        let status = loop {
            match self.world.status() {
                WorldStatus::Won => break GameStatus::Won,
                WorldStatus::Lost => break GameStatus::Lost,
                WorldStatus::Running => {}
            }
            if self.world.tick() >= self.settings.max_ticks {
                break GameStatus::TimedOut;
            }
            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }

            let tick = self.world.tick();
            let tick_start = Instant::now();
            self.observer.on_state_update(&self.world, &self.belief);

            let action = match self.planner.choose_next_move(&self.belief) {
                Ok(action) => Some(action),
                Err(PlannerError::NoDecision { expansions, stop }) => {
                    tracing::warn!(
                        tick = tick,
                        expansions = expansions,
                        stop = ?stop,
                        "No move found, holding position"
                    );
                    holds += 1;
                    None
                }
                Err(err) => return Err(err.into()),
            };
            self.observer.on_action_selected(tick, action);

            let events = self.world.step(action);
            self.observer.on_tick_events(tick, &events);
            self.belief = self.belief.observe(&self.world.observe());

            let tick_duration = tick_start.elapsed();
            if tick_duration.as_millis() > 100 {
                tracing::warn!(
                    tick = tick,
                    elapsed_ms = tick_duration.as_secs_f64() * 1000.0,
                    "Slow tick"
                );
            }
        };

        let summary = GameSummary {
            status,
            ticks: self.world.tick(),
            lives: self.world.lives(),
            pellets_left: self.world.pellets().len(),
            holds,
        };
        self.observer.on_game_finished(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Action, Position};
    use crate::planners::best_first::{Evaluator, PlannerConfig};
    use crate::state::BeliefState;
    use crate::world::TickEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        actions: Vec<Option<Action>>,
        events: Vec<TickEvent>,
        finished: Option<GameSummary>,
    }

    struct RecordingObserver(Rc<RefCell<Recorded>>);

    impl GameObserver for RecordingObserver {
        fn on_game_start(&mut self, _seed: u64, _world: &World) {}

        fn on_state_update(&mut self, _world: &World, _belief: &GridBeliefState) {}

        fn on_action_selected(&mut self, _tick: u32, action: Option<Action>) {
            self.0.borrow_mut().actions.push(action);
        }

        fn on_tick_events(&mut self, _tick: u32, events: &[TickEvent]) {
            self.0.borrow_mut().events.extend_from_slice(events);
        }

        fn on_game_finished(&mut self, summary: &GameSummary) {
            self.0.borrow_mut().finished = Some(summary.clone());
        }
    }

    fn level(rows: &[&str]) -> Level {
        let mut lines: Vec<String> = rows.iter().map(|row| format!("{row:<25}")).collect();
        lines.resize(25, " ".repeat(25));
        Level::parse(&lines.join("\n")).unwrap()
    }

    fn game(level: &Level, settings: GameSettings) -> (Game, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let planner = Planner::new(PlannerConfig::default(), Evaluator::default());
        let game = Game::new(
            level,
            settings,
            planner,
            RecordingObserver(Rc::clone(&recorded)),
        );
        (game, recorded)
    }

    #[tokio::test]
    async fn test_clears_a_corridor() {
        let level = level(&["P.."]);
        let (mut game, recorded) = game(&level, GameSettings::default());

        let summary = game.run().await.unwrap();
        assert_eq!(summary.status, GameStatus::Won);
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.lives, 3);
        assert_eq!(summary.pellets_left, 0);
        assert_eq!(summary.holds, 0);

        let recorded = recorded.borrow();
        assert_eq!(recorded.actions, vec![Some(Action::Right), Some(Action::Right)]);
        assert_eq!(
            recorded.events,
            vec![
                TickEvent::PelletEaten(Position::new(0, 1)),
                TickEvent::PelletEaten(Position::new(0, 2)),
            ]
        );
        assert_eq!(recorded.finished.as_ref(), Some(&summary));
        assert_eq!(game.belief().pellet_count(), 0);
    }

    #[tokio::test]
    async fn test_stops_at_tick_limit() {
        let level = Level::classic().unwrap();
        let settings = GameSettings {
            max_ticks: 3,
            ..GameSettings::default()
        };
        let (mut game, recorded) = game(&level, settings);

        let summary = game.run().await.unwrap();
        assert_eq!(summary.status, GameStatus::TimedOut);
        assert_eq!(summary.ticks, 3);
        assert_eq!(recorded.borrow().actions.len(), 3);
        assert_eq!(game.world().tick(), 3);
    }

    #[tokio::test]
    async fn test_finished_level_needs_no_moves() {
        let level = level(&["P  *"]);
        let (mut game, recorded) = game(&level, GameSettings::default());

        let summary = game.run().await.unwrap();
        assert_eq!(summary.status, GameStatus::Won);
        assert_eq!(summary.ticks, 0);
        assert!(recorded.borrow().actions.is_empty());
    }
}
