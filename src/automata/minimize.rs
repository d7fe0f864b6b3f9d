//! Minimization of deterministic finite automata by table filling.
//!
//! Two states are equivalent if no word drives one of them into a final state and the other one into a non-final state.
//! Minimization runs in two phases:
//!
//! - [mark](Dfa::mark) computes which pairs of states are distinguishable.
//!   Initially, a pair is distinguishable if exactly one of its states is final.
//!   Then the pairs are scanned repeatedly, a pair (p, q) becomes distinguishable if for some symbol c the pair (δ(p, c), δ(q, c)) is distinguishable.
//!   The scans stop as soon as one of them marks no new pair.
//! - [reduce](Dfa::reduce) merges every pair that was never marked and builds the quotient automaton on the equivalence classes.
//!
//! A full scan takes O(|Q|² · |Σ|) time and at most |Q| scans are needed.

use bit_set::BitSet;
use indexmap::{map::Entry, IndexMap};
use log::{debug, trace};

use super::{
    partition::{DisjointSets, EquivalenceClasses},
    AutomatonError, Dfa, DfaComponents, StateId,
};

/// A symmetric relation over pairs of distinct states.
/// Every pair is either distinguishable or unknown. Pairs that stay unknown once marking has finished are equivalent.
/// The pairs (p, q) and (q, p) refer to the same cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinguishabilityTable {
    num_states: usize,
    /// One bit per pair in the strict lower triangle.
    marked: BitSet,
    passes: usize,
}

impl DistinguishabilityTable {
    /// Creates a table over `n` states with every pair unknown.
    fn new(num_states: usize) -> Self {
        let pairs = num_states * num_states.saturating_sub(1) / 2;
        Self {
            num_states,
            marked: BitSet::with_capacity(pairs),
            passes: 0,
        }
    }

    /// Creates a table in which exactly the pairs with one final and one non-final state are distinguishable.
    pub(crate) fn seeded(dfa: &Dfa) -> Self {
        let mut table = Self::new(dfa.num_states());
        for (p, q) in table.pairs() {
            if dfa.is_final(p) != dfa.is_final(q) {
                table.mark(p, q);
            }
        }
        table
    }

    fn index(p: StateId, q: StateId) -> usize {
        let (hi, lo) = if p > q { (p, q) } else { (q, p) };
        hi * (hi - 1) / 2 + lo
    }

    /// Marks the pair as distinguishable. Returns false if it already was.
    fn mark(&mut self, p: StateId, q: StateId) -> bool {
        debug_assert!(p != q && p < self.num_states && q < self.num_states);
        self.marked.insert(Self::index(p, q))
    }

    /// All pairs `(p, q)` with `p < q`.
    fn pairs(&self) -> impl Iterator<Item = (StateId, StateId)> {
        let n = self.num_states;
        (1..n).flat_map(|q| (0..q).map(move |p| (p, q)))
    }

    /// Returns true if the pair is distinguishable.
    /// A state is never distinguishable from itself.
    pub fn is_distinguishable(&self, p: StateId, q: StateId) -> bool {
        p != q && self.marked.contains(Self::index(p, q))
    }

    /// Returns all pairs `(p, q)` with `p < q` that are not marked distinguishable.
    pub fn unknown_pairs(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.pairs()
            .filter(move |&(p, q)| !self.is_distinguishable(p, q))
    }

    /// The number of distinguishable pairs.
    pub fn num_distinguishable(&self) -> usize {
        self.marked.len()
    }

    /// The number of states the table covers.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// The number of full scans the mark phase needed to reach the fixed point.
    pub fn passes(&self) -> usize {
        self.passes
    }
}

/// The outcome of the reduce phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced {
    classes: EquivalenceClasses,
    mapping: IndexMap<String, String>,
    components: DfaComponents,
}

impl Reduced {
    /// Returns true if at least two states were merged.
    pub fn changed(&self) -> bool {
        self.classes.len() < self.mapping.len()
    }

    pub fn classes(&self) -> &EquivalenceClasses {
        &self.classes
    }

    /// Maps the identifier of every original state to the label of its class.
    pub fn mapping(&self) -> &IndexMap<String, String> {
        &self.mapping
    }

    pub fn components(&self) -> &DfaComponents {
        &self.components
    }

    pub fn into_components(self) -> DfaComponents {
        self.components
    }
}

impl Dfa {
    /// Returns the transition function as a table indexed by state and alphabet position.
    /// Fails with [AutomatonError::IncompleteAutomaton] on the first undefined transition in state and alphabet order.
    fn total_transitions(&self) -> Result<Vec<Vec<StateId>>, AutomatonError> {
        let mut delta = Vec::with_capacity(self.num_states());
        for q in self.states() {
            let mut row = Vec::with_capacity(self.alphabet.len());
            for s in self.alphabet.iter() {
                let dest = self
                    .next(q, s)
                    .ok_or_else(|| AutomatonError::IncompleteAutomaton {
                        state: self.name(q).to_string(),
                        symbol: s,
                    })?;
                row.push(dest);
            }
            delta.push(row);
        }
        Ok(delta)
    }

    /// Computes which pairs of states are distinguishable.
    /// Requires a complete automaton, see [Dfa::complete].
    pub fn mark(&self) -> Result<DistinguishabilityTable, AutomatonError> {
        let delta = self.total_transitions()?;
        let mut table = DistinguishabilityTable::seeded(self);
        debug!(
            "mark: {} states, {} pairs distinguishable by acceptance",
            self.num_states(),
            table.num_distinguishable()
        );

        loop {
            table.passes += 1;
            let mut changed = false;
            let pairs: Vec<_> = table.unknown_pairs().collect();
            for (p, q) in pairs {
                let witness = (0..self.alphabet.len())
                    .find(|&i| table.is_distinguishable(delta[p][i], delta[q][i]));
                if let Some(i) = witness {
                    trace!(
                        "mark ({}, {}) via '{}'",
                        self.name(p),
                        self.name(q),
                        self.alphabet.get(i).unwrap_or_default()
                    );
                    table.mark(p, q);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        debug!(
            "mark: fixed point after {} passes, {} distinguishable pairs",
            table.passes,
            table.num_distinguishable()
        );
        Ok(table)
    }

    /// Merges all states that the table leaves unknown and computes the components of the quotient automaton.
    ///
    /// The table must have been computed by [mark](Dfa::mark) on this automaton.
    /// Fails with [AutomatonError::TableMismatch] if the table covers a different number of states,
    /// and with [AutomatonError::InconsistentMerge] if two merged states lead into different classes on the same symbol.
    pub fn reduce(&self, table: &DistinguishabilityTable) -> Result<Reduced, AutomatonError> {
        if table.num_states() != self.num_states() {
            return Err(AutomatonError::TableMismatch {
                table: table.num_states(),
                automaton: self.num_states(),
            });
        }

        let mut sets = DisjointSets::new(self.num_states());
        for (p, q) in table.unknown_pairs() {
            sets.union(p, q);
        }
        let classes = EquivalenceClasses::from_sets(&mut sets, self);
        debug!(
            "reduce: {} states fall into {} classes",
            self.num_states(),
            classes.len()
        );

        let mut rules: IndexMap<(usize, char), usize> = IndexMap::with_capacity(self.rules.len());
        for (from, symbol, to) in self.rules() {
            let target = classes.class_of(to);
            match rules.entry((classes.class_of(from), symbol)) {
                Entry::Vacant(e) => {
                    e.insert(target);
                }
                Entry::Occupied(e) if *e.get() == target => {}
                Entry::Occupied(e) => {
                    return Err(AutomatonError::InconsistentMerge {
                        class: classes.label_of(from).to_string(),
                        symbol,
                        first: classes.label(*e.get()).to_string(),
                        second: classes.label(target).to_string(),
                    })
                }
            }
        }

        let mut final_classes: Vec<usize> = self.finals().map(|q| classes.class_of(q)).collect();
        final_classes.sort_unstable();
        final_classes.dedup();

        let components = DfaComponents {
            alphabet: self.alphabet.iter().collect(),
            states: (0..classes.len())
                .map(|c| classes.label(c).to_string())
                .collect(),
            initial_state: classes.label_of(self.initial).to_string(),
            final_states: final_classes
                .into_iter()
                .map(|c| classes.label(c).to_string())
                .collect(),
            rules: rules
                .into_iter()
                .map(|((from, symbol), to)| {
                    (
                        classes.label(from).to_string(),
                        symbol,
                        classes.label(to).to_string(),
                    )
                })
                .collect(),
        };
        let mapping = self
            .states()
            .map(|q| (self.name(q).to_string(), classes.label_of(q).to_string()))
            .collect();

        Ok(Reduced {
            classes,
            mapping,
            components,
        })
    }

    /// Builds the minimal automaton equivalent to this one by running [mark](Dfa::mark) and [reduce](Dfa::reduce).
    /// The flag is true if any states were merged.
    /// Unreachable states are not removed, see [prune_and_minimize](Dfa::prune_and_minimize).
    pub fn minimize(&self) -> Result<(Dfa, bool), AutomatonError> {
        let table = self.mark()?;
        let reduced = self.reduce(&table)?;
        if !reduced.changed() {
            return Ok((self.clone(), false));
        }
        Ok((self.derive(reduced.into_components())?, true))
    }

    /// Removes inaccessible states, then minimizes the result.
    /// The flag is true if either step changed the automaton.
    pub fn prune_and_minimize(&self) -> Result<(Dfa, bool), AutomatonError> {
        let (pruned, removed) = self.prune()?;
        let (minimal, merged) = pruned.minimize()?;
        Ok((minimal, removed || merged))
    }
}
