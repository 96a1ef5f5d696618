use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::hash::Hash;

struct Node<B> {
    key: f64,
    seq: u64,
    state: B,
}

impl<B> PartialEq for Node<B> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<B> Eq for Node<B> {}

impl<B> PartialOrd for Node<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B> Ord for Node<B> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; earlier pushes win ties.
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of belief states with a membership index kept in sync
/// on every push and pop.
pub struct Frontier<B> {
    heap: BinaryHeap<Node<B>>,
    members: HashSet<B>,
    next_seq: u64,
}

impl<B: Clone + Eq + Hash> Default for Frontier<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Clone + Eq + Hash> Frontier<B> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            members: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Queues `state` unless an equal state is already waiting.
    pub fn push(&mut self, state: B, key: f64) -> bool {
        if !self.members.insert(state.clone()) {
            return false;
        }
        self.heap.push(Node {
            key,
            seq: self.next_seq,
            state,
        });
        self.next_seq += 1;
        true
    }

    pub fn pop(&mut self) -> Option<(B, f64)> {
        let Node { key, state, .. } = self.heap.pop()?;
        self.members.remove(&state);
        Some((state, key))
    }

    pub fn contains(&self, state: &B) -> bool {
        self.members.contains(state)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
