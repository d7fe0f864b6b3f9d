//! Removal of states that cannot be reached from the initial state.

use std::collections::VecDeque;

use bit_set::BitSet;
use log::debug;

use super::{AutomatonError, Dfa, DfaComponents, StateId};

/// The outcome of removing inaccessible states.
/// Holds the components of the pruned automaton together with the identifiers of the removed states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pruned {
    components: DfaComponents,
    removed: Vec<String>,
}

impl Pruned {
    /// Returns true if at least one state was removed.
    pub fn changed(&self) -> bool {
        !self.removed.is_empty()
    }

    /// Returns the identifiers of the removed states, in declaration order.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn components(&self) -> &DfaComponents {
        &self.components
    }

    pub fn into_components(self) -> DfaComponents {
        self.components
    }
}

impl Dfa {
    /// Returns the set of states reachable from the initial state by following zero or more transitions.
    /// Runs in O(|V| + |E|) time using a BFS.
    pub fn reachable(&self) -> BitSet {
        let mut reachable = BitSet::with_capacity(self.num_states());
        let mut queue = VecDeque::new();
        queue.push_back(self.initial);
        reachable.insert(self.initial);

        while let Some(state) = queue.pop_front() {
            for symbol in self.alphabet.iter() {
                if let Some(dest) = self.next(state, symbol) {
                    // Insert returns true if newly inserted
                    if reachable.insert(dest) {
                        queue.push_back(dest);
                    }
                }
            }
        }
        reachable
    }

    /// Computes the components of the automaton restricted to the states reachable from the initial state.
    /// States keep their identifiers and relative order, the initial state is unchanged.
    /// The automaton itself is not modified.
    pub fn remove_inaccessible_states(&self) -> Pruned {
        let reachable = self.reachable();
        let keep = |q: StateId| reachable.contains(q);

        let removed: Vec<String> = self
            .states()
            .filter(|&q| !keep(q))
            .map(|q| self.name(q).to_string())
            .collect();
        debug!(
            "pruning removes {} of {} states: {:?}",
            removed.len(),
            self.num_states(),
            removed
        );

        let components = DfaComponents {
            alphabet: self.alphabet.iter().collect(),
            states: self
                .states()
                .filter(|&q| keep(q))
                .map(|q| self.name(q).to_string())
                .collect(),
            initial_state: self.initial_state().to_string(),
            final_states: self
                .finals()
                .filter(|&q| keep(q))
                .map(|q| self.name(q).to_string())
                .collect(),
            rules: self
                .rules()
                .filter(|&(from, _, to)| keep(from) && keep(to))
                .map(|(from, symbol, to)| {
                    (self.name(from).to_string(), symbol, self.name(to).to_string())
                })
                .collect(),
        };
        Pruned {
            components,
            removed,
        }
    }

    /// Removes inaccessible states and builds the resulting automaton.
    /// The flag is true if any state was removed.
    pub fn prune(&self) -> Result<(Dfa, bool), AutomatonError> {
        let pruned = self.remove_inaccessible_states();
        if !pruned.changed() {
            return Ok((self.clone(), false));
        }
        Ok((self.derive(pruned.into_components())?, true))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::super::fixtures;
    use super::*;

    #[test]
    fn test_prune_reference() {
        fixtures::init_logger();
        let dfa = fixtures::reference();
        let pruned = dfa.remove_inaccessible_states();
        assert!(pruned.changed());
        assert_eq!(pruned.removed(), &["q6".to_string(), "q7".to_string()]);

        let components = pruned.components();
        assert_eq!(components.states, vec!["q0", "q1", "q2", "q3", "q4", "q5"]);
        assert_eq!(components.initial_state, "q0");
        assert_eq!(components.final_states, vec!["q5"]);
        assert_eq!(components.rules.len(), 12);
        assert!(components
            .rules
            .iter()
            .all(|(from, _, to)| from != "q6" && from != "q7" && to != "q6" && to != "q7"));
    }

    #[test]
    fn test_prune_does_not_mutate() {
        let dfa = fixtures::reference();
        let (pruned, changed) = dfa.prune().unwrap();
        assert!(changed);
        assert_eq!(pruned.num_states(), 6);
        assert_eq!(dfa.num_states(), 8);
    }

    #[test]
    fn test_prune_drops_unreachable_finals() {
        let dfa = Dfa::new(
            ['x'],
            ["a", "b", "c"],
            "a",
            ["a", "c"],
            [("a", 'x', "b"), ("c", 'x', "a")],
        )
        .unwrap();
        let (pruned, changed) = dfa.prune().unwrap();
        assert!(changed);
        assert_eq!(pruned.final_states().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(pruned.num_transitions(), 1);
    }

    #[test]
    fn test_prune_single_state() {
        let dfa = Dfa::new(['a'], ["q"], "q", Vec::<String>::new(), Vec::<(String, char, String)>::new())
            .unwrap();
        let pruned = dfa.remove_inaccessible_states();
        assert!(!pruned.changed());
        assert_eq!(pruned.components(), &dfa.components());
    }

    #[test]
    fn test_prune_then_validate() {
        let dfa = fixtures::reference();
        let (pruned, _) = dfa.prune().unwrap();
        for w in ["aab", "bbbb", "", "ab", "babba"] {
            assert_eq!(dfa.accepts(w), pruned.accepts(w), "word {:?}", w);
        }
    }

    #[quickcheck]
    fn pruning_is_idempotent(dfa: Dfa) -> bool {
        let (once, _) = dfa.prune().unwrap();
        let (_, changed) = once.prune().unwrap();
        !changed
    }

    #[quickcheck]
    fn pruning_keeps_initial(dfa: Dfa) -> bool {
        let (pruned, _) = dfa.prune().unwrap();
        pruned.initial_state() == dfa.initial_state()
    }
}
