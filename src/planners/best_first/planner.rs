use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::infra::Action;
use crate::planners::best_first::evaluator::Evaluator;
use crate::planners::best_first::frontier::Frontier;
use crate::planners::best_first::plan::Plan;
use crate::state::{BeliefError, BeliefState};

/// Lifetime of the explored set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExploredScope {
    /// Fresh set for every decision.
    #[default]
    PerDecision,
    /// One set for the planner's whole life; a state expanded on an earlier
    /// tick is never expanded again.
    Cumulative,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Number of frontier pops per decision.
    pub expansion_budget: usize,
    /// Wall-clock guard on top of the budget.
    pub time_limit: Option<Duration>,
    pub explored_scope: ExploredScope,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            expansion_budget: 2,
            time_limit: None,
            explored_scope: ExploredScope::PerDecision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    BudgetExhausted,
    GoalReached,
    FrontierExhausted,
    TimeLimit,
}

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid belief state: {0}")]
    InvalidBelief(#[from] BeliefError),
    #[error("no action recovered after {expansions} expansions ({stop:?})")]
    NoDecision { expansions: usize, stop: StopReason },
}

/// Everything one search produced.
#[derive(Debug, Clone)]
pub struct SearchReport<B> {
    /// Last state taken off the frontier.
    pub terminal: B,
    pub stop: StopReason,
    pub pops: usize,
    pub expansions: usize,
    pub plan: Plan<B>,
}

impl<B: BeliefState> SearchReport<B> {
    /// Move leading towards `terminal`: the last of the equivalent actions of
    /// the first association that discovered it, traced back to the root.
    pub fn decision(&self) -> Option<Action> {
        let index = self.plan.first_containing(&self.terminal)?;
        self.plan.root_actions(index).last().copied()
    }
}

/// Best-first search over belief states, ordered by path cost plus
/// heuristic.
pub struct Planner<B> {
    config: PlannerConfig,
    evaluator: Evaluator,
    history: HashSet<B>,
}

impl<B: BeliefState> Planner<B> {
    pub fn new(config: PlannerConfig, evaluator: Evaluator) -> Self {
        Self {
            config,
            evaluator,
            history: HashSet::new(),
        }
    }

    pub fn choose_next_move(&mut self, initial: &B) -> Result<Action, PlannerError> {
        let report = self.search(initial)?;
        let decision = report.decision().ok_or(PlannerError::NoDecision {
            expansions: report.expansions,
            stop: report.stop,
        })?;

        tracing::info!(
            action = %decision,
            stop = ?report.stop,
            pops = report.pops,
            expansions = report.expansions,
            associations = report.plan.len(),
            "Chose next move"
        );
        Ok(decision)
    }

    #[tracing::instrument(skip(self, initial), fields(budget = self.config.expansion_budget))]
    pub fn search(&mut self, initial: &B) -> Result<SearchReport<B>, PlannerError> {
        initial.validate()?;

        let start_time = Instant::now();
        let mut explored = match self.config.explored_scope {
            ExploredScope::PerDecision => HashSet::new(),
            ExploredScope::Cumulative => std::mem::take(&mut self.history),
        };
        let mut frontier = Frontier::new();
        let mut plan = Plan::new();
        let mut discovered: HashMap<B, usize> = HashMap::new();

        frontier.push(initial.clone(), self.priority(initial, initial));
        let mut current = initial.clone();
        let mut pops = 0;
        let mut expansions = 0;

        let stop = loop {
            if pops >= self.config.expansion_budget {
                break StopReason::BudgetExhausted;
            }
            if let Some(limit) = self.config.time_limit
                && start_time.elapsed() >= limit
            {
                tracing::warn!(pops = pops, expansions = expansions, "Planning timeout");
                break StopReason::TimeLimit;
            }
            let Some((state, key)) = frontier.pop() else {
                break StopReason::FrontierExhausted;
            };
            pops += 1;
            current = state;

            if explored.contains(&current) {
                tracing::debug!(key = key, "Skipping explored state");
                continue;
            }
            if current.pellet_count() == 0 {
                tracing::debug!(key = key, pops = pops, "Popped state with no pellets left");
                break StopReason::GoalReached;
            }

            explored.insert(current.clone());
            expansions += 1;
            let origin = discovered.get(&current).copied();

            let successors = current.expand();
            tracing::debug!(
                key = key,
                pacman = %current.pacman_position(),
                associations = successors.len(),
                frontier = frontier.len(),
                "Expanding state"
            );

            for entry in successors.into_entries() {
                let mut recorded = None;
                for state in entry.outcome.iter() {
                    if explored.contains(state) || frontier.contains(state) {
                        continue;
                    }
                    let index = *recorded.get_or_insert_with(|| {
                        plan.record_from(entry.outcome.clone(), entry.actions.clone(), origin)
                    });
                    discovered.entry(state.clone()).or_insert(index);

                    let priority = self.priority(state, initial);
                    tracing::trace!(
                        actions = ?entry.actions,
                        pacman = %state.pacman_position(),
                        priority = priority,
                        "Queueing belief state"
                    );
                    frontier.push(state.clone(), priority);
                }
            }
        };

        if self.config.explored_scope == ExploredScope::Cumulative {
            self.history = explored;
        }

        tracing::debug!(
            stop = ?stop,
            pops = pops,
            expansions = expansions,
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "Search completed"
        );

        Ok(SearchReport {
            terminal: current,
            stop,
            pops,
            expansions,
            plan,
        })
    }

    /// `g + h` of a state relative to the search root.
    fn priority(&self, state: &B, root: &B) -> f64 {
        state.relative_order(root) as f64 + self.evaluator.evaluate(state)
    }
}
