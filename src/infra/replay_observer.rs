use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description};

use crate::game::GameSummary;
use crate::infra::{Action, GameObserver};
use crate::state::GridBeliefState;
use crate::world::{TickEvent, World};

/// Writes a line-oriented record of one game to the replays folder.
pub struct ReplayObserver {
    file: File,
    path: PathBuf,
}

impl ReplayObserver {
    pub fn new(replays_folder: impl AsRef<Path>, seed: u64) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let description = format_description::parse("[year][month][day]-[hour][minute][second]")
            .map_err(io::Error::other)?;
        let date_time_str = now.format(&description).map_err(io::Error::other)?;

        let path = replays_folder
            .as_ref()
            .join(format!("pacsearch - {} - {}.replay", date_time_str, seed));

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        tracing::info!(path = %path.display(), "Recording replay");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: &str) {
        let result = writeln!(self.file, "{}", line).and_then(|_| self.file.flush());
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), error = %err, "Failed to write replay");
        }
    }
}

impl GameObserver for ReplayObserver {
    fn on_game_start(&mut self, seed: u64, world: &World) {
        let ghosts: Vec<String> = world.ghosts().iter().map(|g| g.position.to_string()).collect();
        self.write_line(&format!("seed {}", seed));
        self.write_line(&format!(
            "start pacman={} ghosts=[{}] pellets={} power_pellets={} lives={}",
            world.pacman(),
            ghosts.join(" "),
            world.pellets().len(),
            world.power_pellets().len(),
            world.lives()
        ));
    }

    fn on_state_update(&mut self, _world: &World, _belief: &GridBeliefState) {}

    fn on_action_selected(&mut self, tick: u32, action: Option<Action>) {
        let action = action.map_or("HOLD", |action| action.as_str());
        self.write_line(&format!("tick {} action {}", tick, action));
    }

    fn on_tick_events(&mut self, tick: u32, events: &[TickEvent]) {
        for event in events {
            self.write_line(&format!("tick {} event {:?}", tick, event));
        }
    }

    fn on_game_finished(&mut self, summary: &GameSummary) {
        self.write_line(&format!(
            "finished {:?} ticks={} lives={} pellets_left={}",
            summary.status, summary.ticks, summary.lives, summary.pellets_left
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use crate::infra::Position;
    use crate::state::Level;

    #[test]
    fn test_replay_records_game() {
        let folder = std::env::temp_dir().join(format!("pacsearch-replay-{}", std::process::id()));
        let level = Level::classic().unwrap();
        let world = World::new(&level, 3, 5);

        let mut replay = ReplayObserver::new(&folder, 5).unwrap();
        replay.on_game_start(5, &world);
        replay.on_action_selected(0, Some(Action::Left));
        replay.on_tick_events(0, &[TickEvent::PelletEaten(Position::new(15, 10))]);
        replay.on_action_selected(1, None);
        replay.on_game_finished(&GameSummary {
            status: GameStatus::TimedOut,
            ticks: 2,
            lives: 3,
            pellets_left: 10,
            holds: 1,
        });

        let path = replay.path().to_path_buf();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(" - 5.replay"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "seed 5");
        assert!(lines[1].starts_with("start pacman=(15, 11) ghosts=[(9, 9) (9, 13)]"));
        assert_eq!(lines[2], "tick 0 action LEFT");
        assert_eq!(lines[3], "tick 0 event PelletEaten(Position { row: 15, col: 10 })");
        assert_eq!(lines[4], "tick 1 action HOLD");
        assert_eq!(lines[5], "finished TimedOut ticks=2 lives=3 pellets_left=10");

        let _ = std::fs::remove_dir_all(&folder);
    }
}
