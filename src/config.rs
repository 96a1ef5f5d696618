use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::game::GameSettings;
use crate::planners::best_first::{ExploredScope, PlannerConfig};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be at least {min}")]
    TooSmall { key: &'static str, min: u64 },
}

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Level file; the built-in maze when absent.
    pub level: Option<PathBuf>,
    /// Ghost RNG seed; random when absent.
    pub seed: Option<u64>,
    pub lives: u32,
    pub max_ticks: u32,
    pub tick_ms: u64,
    pub expansion_budget: usize,
    pub time_limit: Option<Duration>,
    pub cumulative_explored: bool,
    pub replays_folder: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let game = GameSettings::default();
        let planner = PlannerConfig::default();
        Self {
            level: None,
            seed: None,
            lives: game.lives,
            max_ticks: game.max_ticks,
            tick_ms: game.tick_ms,
            expansion_budget: planner.expansion_budget,
            time_limit: planner.time_limit,
            cumulative_explored: false,
            replays_folder: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let expansion_budget =
            parse_var(&lookup, "PACSEARCH_EXPANSION_BUDGET")?.unwrap_or(defaults.expansion_budget);
        if expansion_budget == 0 {
            return Err(ConfigError::TooSmall {
                key: "PACSEARCH_EXPANSION_BUDGET",
                min: 1,
            });
        }
        let lives = parse_var(&lookup, "PACSEARCH_LIVES")?.unwrap_or(defaults.lives);
        if lives == 0 {
            return Err(ConfigError::TooSmall {
                key: "PACSEARCH_LIVES",
                min: 1,
            });
        }

        Ok(Self {
            level: lookup("PACSEARCH_LEVEL").map(PathBuf::from),
            seed: parse_var(&lookup, "PACSEARCH_SEED")?,
            lives,
            max_ticks: parse_var(&lookup, "PACSEARCH_MAX_TICKS")?.unwrap_or(defaults.max_ticks),
            tick_ms: parse_var(&lookup, "PACSEARCH_TICK_MS")?.unwrap_or(defaults.tick_ms),
            expansion_budget,
            time_limit: parse_var(&lookup, "PACSEARCH_TIME_LIMIT_MS")?
                .map(Duration::from_millis)
                .or(defaults.time_limit),
            cumulative_explored: parse_var(&lookup, "PACSEARCH_CUMULATIVE_EXPLORED")?
                .unwrap_or(defaults.cumulative_explored),
            replays_folder: lookup("PACSEARCH_REPLAYS_FOLDER").map(PathBuf::from),
        })
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            expansion_budget: self.expansion_budget,
            time_limit: self.time_limit,
            explored_scope: if self.cumulative_explored {
                ExploredScope::Cumulative
            } else {
                ExploredScope::PerDecision
            },
        }
    }

    pub fn game_settings(&self, seed: u64) -> GameSettings {
        GameSettings {
            seed,
            lives: self.lives,
            max_ticks: self.max_ticks,
            tick_ms: self.tick_ms,
            ..GameSettings::default()
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
