use crate::infra::Action;

/// The distinct belief states one action choice can lead to from one state.
/// Never empty; the order is the order expansion produced them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<B> {
    states: Vec<B>,
}

impl<B> Outcome<B> {
    pub fn new(states: Vec<B>) -> Option<Self> {
        if states.is_empty() {
            None
        } else {
            Some(Self { states })
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &[B] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = &B> {
        self.states.iter()
    }
}

impl<B: PartialEq> Outcome<B> {
    pub fn contains(&self, state: &B) -> bool {
        self.states.iter().any(|candidate| candidate == state)
    }
}

/// One recorded association: an outcome, the equivalent actions producing it,
/// and the association its parent state was discovered in.
#[derive(Debug, Clone)]
pub struct PlanEntry<B> {
    pub outcome: Outcome<B>,
    pub actions: Vec<Action>,
    pub origin: Option<usize>,
}

/// Ordered (outcome, actions) associations. Used both as the output of a
/// belief-state expansion and as the running trace of a search.
#[derive(Debug, Clone)]
pub struct Plan<B> {
    entries: Vec<PlanEntry<B>>,
}

impl<B> Default for Plan<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Plan<B> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: Outcome<B>, actions: Vec<Action>) -> usize {
        self.record_from(outcome, actions, None)
    }

    /// Appends an association and returns its index.
    pub fn record_from(
        &mut self,
        outcome: Outcome<B>,
        actions: Vec<Action>,
        origin: Option<usize>,
    ) -> usize {
        debug_assert!(!actions.is_empty(), "association without actions");
        debug_assert!(origin.is_none_or(|index| index < self.entries.len()));
        self.entries.push(PlanEntry {
            outcome,
            actions,
            origin,
        });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn outcome(&self, index: usize) -> &Outcome<B> {
        &self.entries[index].outcome
    }

    pub fn actions(&self, index: usize) -> &[Action] {
        &self.entries[index].actions
    }

    pub fn entries(&self) -> &[PlanEntry<B>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PlanEntry<B>> {
        self.entries
    }

    /// Actions of the association that leads out of the search root towards
    /// `index`, following discovery links.
    pub fn root_actions(&self, index: usize) -> &[Action] {
        let mut current = index;
        while let Some(origin) = self.entries[current].origin {
            current = origin;
        }
        &self.entries[current].actions
    }
}

impl<B: PartialEq> Plan<B> {
    /// First association, in discovery order, whose outcome holds `state`.
    pub fn first_containing(&self, state: &B) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.outcome.contains(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(states: &[u32]) -> Outcome<u32> {
        Outcome::new(states.to_vec()).unwrap()
    }

    #[test]
    fn test_outcome_rejects_empty() {
        assert!(Outcome::<u32>::new(Vec::new()).is_none());
        let single = outcome(&[7]);
        assert_eq!(single.len(), 1);
        assert!(single.contains(&7));
        assert!(!single.contains(&8));
    }

    #[test]
    fn test_first_containing_prefers_discovery_order() {
        let mut plan = Plan::new();
        plan.record(outcome(&[1, 2]), vec![Action::Up]);
        plan.record(outcome(&[2, 3]), vec![Action::Down, Action::Left]);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.first_containing(&2), Some(0));
        assert_eq!(plan.first_containing(&3), Some(1));
        assert_eq!(plan.first_containing(&4), None);
        assert_eq!(plan.actions(1).last(), Some(&Action::Left));
    }

    #[test]
    fn test_root_actions_follow_origin_links() {
        let mut plan = Plan::new();
        let root_child = plan.record(outcome(&[1]), vec![Action::Right]);
        let grandchild = plan.record_from(outcome(&[2]), vec![Action::Up], Some(root_child));
        let deeper = plan.record_from(outcome(&[3]), vec![Action::Left], Some(grandchild));

        assert_eq!(plan.root_actions(deeper), &[Action::Right]);
        assert_eq!(plan.root_actions(root_child), &[Action::Right]);
        assert_eq!(plan.entries()[deeper].origin, Some(grandchild));
    }
}
