//! Partitions of the states of an automaton into equivalence classes.

use itertools::Itertools;
use smallvec::SmallVec;

use super::{Dfa, StateId};

/// Disjoint sets over `0..n` with path compression and union by rank.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    /// Creates `n` singleton sets.
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Returns the representative of the set containing `x`.
    pub(crate) fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // compress
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merges the sets containing `a` and `b`.
    /// Returns false if they were already the same set.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// A partition of the states of an automaton into nonempty, disjoint classes.
/// Classes are ordered by their first member in declaration order of the states, members within a class likewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClasses {
    members: Vec<SmallVec<[StateId; 4]>>,
    class_of: Vec<usize>,
    labels: Vec<String>,
}

impl EquivalenceClasses {
    /// Derives the classes from the disjoint sets over the states of `dfa`.
    pub(crate) fn from_sets(sets: &mut DisjointSets, dfa: &Dfa) -> Self {
        let n = dfa.num_states();
        let mut class_of_root: Vec<Option<usize>> = vec![None; n];
        let mut members: Vec<SmallVec<[StateId; 4]>> = Vec::new();
        let mut class_of = Vec::with_capacity(n);

        for q in dfa.states() {
            let root = sets.find(q);
            let class = match class_of_root[root] {
                Some(c) => c,
                None => {
                    members.push(SmallVec::new());
                    class_of_root[root] = Some(members.len() - 1);
                    members.len() - 1
                }
            };
            members[class].push(q);
            class_of.push(class);
        }

        let labels = members
            .iter()
            .map(|m| {
                if m.len() == 1 {
                    dfa.name(m[0]).to_string()
                } else {
                    m.iter().map(|&q| dfa.name(q)).sorted().join(", ")
                }
            })
            .collect();

        Self {
            members,
            class_of,
            labels,
        }
    }

    /// The number of classes.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if there are no classes, which only happens for an automaton without states.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the index of the class containing the state.
    ///
    /// # Panics
    /// If the state is not a state of the partitioned automaton.
    pub fn class_of(&self, state: StateId) -> usize {
        self.class_of[state]
    }

    /// Returns the members of a class.
    pub fn members(&self, class: usize) -> &[StateId] {
        &self.members[class]
    }

    /// Returns the canonical label of a class.
    /// A singleton class keeps the identifier of its state, a larger class is labelled by the sorted identifiers of its members joined with `", "`.
    pub fn label(&self, class: usize) -> &str {
        &self.labels[class]
    }

    /// Returns the label of the class containing the state.
    pub fn label_of(&self, state: StateId) -> &str {
        self.label(self.class_of(state))
    }

    /// Returns an iterator over the classes as slices of their members.
    pub fn iter(&self) -> impl Iterator<Item = &[StateId]> {
        self.members.iter().map(|m| m.as_slice())
    }
}
