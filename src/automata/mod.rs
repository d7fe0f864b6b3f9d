//! Deterministic finite automata over single-character symbols.
//!
//! A [Dfa] is immutable once built. Every derived automaton (pruned, completed, minimized) is a new value
//! that is constructed through the same checks as a hand-written one, see [Dfa::build_from].

mod arbitrary;
mod complete;
mod error;
mod minimize;
mod partition;
mod prune;
mod trace;

use std::fmt::Display;

use bit_set::BitSet;
use indexmap::{map::Entry, IndexMap, IndexSet};
use itertools::Itertools;

use crate::alphabet::{Alphabet, Symbol};

pub use error::{AutomatonError, Malformed, Resource};
pub use minimize::{DistinguishabilityTable, Reduced};
pub use partition::EquivalenceClasses;
pub use prune::Pruned;
pub use trace::{Trace, Validation, Verdict};

/// Every state is identified by its position in the declared order of states.
pub type StateId = usize;

/// Upper bounds on the size of an automaton.
/// Building an automaton that exceeds them fails with [AutomatonError::SizeLimitExceeded].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_states: usize,
    pub max_symbols: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_states: 4096,
            max_symbols: 256,
        }
    }
}

impl Limits {
    /// Limits that accept automata of any size.
    pub fn unbounded() -> Self {
        Self {
            max_states: usize::MAX,
            max_symbols: usize::MAX,
        }
    }

    fn check(&self, resource: Resource, actual: usize) -> Result<(), AutomatonError> {
        let max = match resource {
            Resource::States => self.max_states,
            Resource::Symbols => self.max_symbols,
        };
        if actual > max {
            Err(AutomatonError::SizeLimitExceeded {
                resource,
                actual,
                max,
            })
        } else {
            Ok(())
        }
    }
}

/// The plain description of an automaton.
/// This is what callers fill in to describe an automaton and what every derived stage produces, see [Dfa::build_from].
/// States are referred to by their identifiers, rules are `(source, symbol, target)` triples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaComponents {
    pub alphabet: Vec<Symbol>,
    pub states: Vec<String>,
    pub initial_state: String,
    pub final_states: Vec<String>,
    pub rules: Vec<(String, Symbol, String)>,
}

/// All transitions between two states, grouped into a single edge.
/// The symbols are sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: StateId,
    pub to: StateId,
    pub symbols: Vec<Symbol>,
}

impl Edge {
    /// The symbols of the edge, joined by `", "`.
    pub fn label(&self) -> String {
        self.symbols.iter().join(", ")
    }

    /// Returns true if the edge starts and ends in the same state.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

/// A deterministic finite automaton.
/// The automaton consists of an alphabet, a sequence of uniquely named states, an initial state, a set of final states and a partial transition function.
/// A missing transition rejects the input.
#[derive(Debug, Clone)]
pub struct Dfa {
    alphabet: Alphabet,
    states: IndexSet<String>,
    initial: StateId,
    finals: BitSet,
    rules: IndexMap<(StateId, Symbol), StateId>,
    limits: Limits,
}

impl Dfa {
    /// Creates a new automaton from its five components.
    /// Fails with [AutomatonError::InvalidAutomaton] if any state or symbol referenced by the initial state, the final states or the rules is not declared.
    ///
    /// # Example
    /// ```
    /// use dfa_min::automata::Dfa;
    ///
    /// // accepts all words over {a, b} that end in 'b'
    /// let dfa = Dfa::new(
    ///     ['a', 'b'],
    ///     ["q0", "q1"],
    ///     "q0",
    ///     ["q1"],
    ///     [("q0", 'a', "q0"), ("q0", 'b', "q1"), ("q1", 'a', "q0"), ("q1", 'b', "q1")],
    /// )
    /// .unwrap();
    /// assert!(dfa.accepts("aab"));
    /// assert!(!dfa.accepts("ba"));
    /// ```
    pub fn new<S, F, A, B>(
        alphabet: impl IntoIterator<Item = Symbol>,
        states: impl IntoIterator<Item = S>,
        initial_state: impl Into<String>,
        final_states: impl IntoIterator<Item = F>,
        rules: impl IntoIterator<Item = (A, Symbol, B)>,
    ) -> Result<Self, AutomatonError>
    where
        S: Into<String>,
        F: Into<String>,
        A: Into<String>,
        B: Into<String>,
    {
        Self::build_from(DfaComponents {
            alphabet: alphabet.into_iter().collect(),
            states: states.into_iter().map(Into::into).collect(),
            initial_state: initial_state.into(),
            final_states: final_states.into_iter().map(Into::into).collect(),
            rules: rules
                .into_iter()
                .map(|(from, symbol, to)| (from.into(), symbol, to.into()))
                .collect(),
        })
    }

    /// Builds an automaton from its components using the default [Limits].
    pub fn build_from(components: DfaComponents) -> Result<Self, AutomatonError> {
        Self::build_with_limits(components, Limits::default())
    }

    /// Builds an automaton from its components.
    /// The size limits are checked first, then every invariant of the automaton.
    /// Repeating a rule verbatim is allowed, two rules with the same source and symbol but different targets are not.
    pub fn build_with_limits(
        components: DfaComponents,
        limits: Limits,
    ) -> Result<Self, AutomatonError> {
        let DfaComponents {
            alphabet,
            states,
            initial_state,
            final_states,
            rules,
        } = components;
        limits.check(Resource::Symbols, alphabet.len())?;
        limits.check(Resource::States, states.len())?;

        let alphabet = Alphabet::try_from_symbols(alphabet).map_err(Malformed::DuplicateSymbol)?;

        let mut names = IndexSet::with_capacity(states.len());
        for state in states {
            if names.contains(&state) {
                return Err(Malformed::DuplicateState(state).into());
            }
            names.insert(state);
        }

        let initial = names
            .get_index_of(&initial_state)
            .ok_or_else(|| Malformed::UnknownInitialState(initial_state.clone()))?;

        let mut finals = BitSet::with_capacity(names.len());
        for state in final_states {
            let id = names
                .get_index_of(&state)
                .ok_or_else(|| Malformed::UnknownFinalState(state.clone()))?;
            finals.insert(id);
        }

        let mut table = IndexMap::with_capacity(rules.len());
        for (from, symbol, to) in rules {
            let src = names
                .get_index_of(&from)
                .ok_or_else(|| Malformed::UnknownRuleSource {
                    state: from.clone(),
                    symbol,
                })?;
            if !alphabet.contains(symbol) {
                return Err(Malformed::UnknownSymbol {
                    state: from,
                    symbol,
                }
                .into());
            }
            let dest = names
                .get_index_of(&to)
                .ok_or_else(|| Malformed::UnknownRuleTarget {
                    state: from.clone(),
                    symbol,
                    target: to.clone(),
                })?;
            match table.entry((src, symbol)) {
                Entry::Vacant(e) => {
                    e.insert(dest);
                }
                Entry::Occupied(e) if *e.get() == dest => {}
                Entry::Occupied(e) => {
                    return Err(Malformed::ConflictingRule {
                        state: from,
                        symbol,
                        first: names[*e.get()].clone(),
                        second: to,
                    }
                    .into())
                }
            }
        }

        Ok(Self {
            alphabet,
            states: names,
            initial,
            finals,
            rules: table,
            limits,
        })
    }

    /// Builds an automaton derived from this one, inheriting its limits.
    pub(crate) fn derive(&self, components: DfaComponents) -> Result<Self, AutomatonError> {
        Self::build_with_limits(components, self.limits)
    }

    /// Returns the alphabet of the automaton.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the limits the automaton was built with.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Returns the number of states in the automaton.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of defined transitions.
    pub fn num_transitions(&self) -> usize {
        self.rules.len()
    }

    /// Returns an iterator over the states of the automaton, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        0..self.states.len()
    }

    /// Returns an iterator over the identifiers of the states, in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(String::as_str)
    }

    /// Returns the identifier of a state, or `None` if the index is not a valid state.
    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.states.get_index(state).map(String::as_str)
    }

    /// Looks up a state by its identifier.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.get_index_of(name)
    }

    /// Identifier of a state known to be valid.
    pub(crate) fn name(&self, state: StateId) -> &str {
        &self.states[state]
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Returns the identifier of the initial state.
    pub fn initial_state(&self) -> &str {
        self.name(self.initial)
    }

    /// Returns an iterator over the final states, in declaration order.
    pub fn finals(&self) -> impl Iterator<Item = StateId> + '_ {
        self.finals.iter()
    }

    /// Returns an iterator over the identifiers of the final states, in declaration order.
    pub fn final_states(&self) -> impl Iterator<Item = &str> {
        self.finals().map(|q| self.name(q))
    }

    /// Returns if a state is a final state.
    /// Invalid indices are not considered final states.
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state)
    }

    /// Returns the state reached from `state` on `symbol`, if the transition is defined.
    pub fn next(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.rules.get(&(state, symbol)).copied()
    }

    /// Returns an iterator over all transitions as `(source, symbol, target)`, in the order they were declared.
    pub fn rules(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.rules.iter().map(|(&(from, symbol), &to)| (from, symbol, to))
    }

    /// Returns an iterator over all pairs of state and symbol that have no transition.
    /// The pairs are enumerated in state order, then alphabet order.
    pub fn missing_transitions(&self) -> impl Iterator<Item = (StateId, Symbol)> + '_ {
        self.states().flat_map(move |q| {
            self.alphabet
                .iter()
                .filter(move |&s| !self.rules.contains_key(&(q, s)))
                .map(move |s| (q, s))
        })
    }

    /// Checks if the transition function is total.
    pub fn is_complete(&self) -> bool {
        self.missing_transitions().next().is_none()
    }

    /// Returns the transitions grouped by source and target state.
    /// Edges are ordered by the first transition that contributes to them.
    pub fn edges(&self) -> Vec<Edge> {
        let mut grouped: IndexMap<(StateId, StateId), Vec<Symbol>> = IndexMap::new();
        for (from, symbol, to) in self.rules() {
            grouped.entry((from, to)).or_default().push(symbol);
        }
        grouped
            .into_iter()
            .map(|((from, to), symbols)| Edge {
                from,
                to,
                symbols: symbols.into_iter().sorted().collect(),
            })
            .collect()
    }

    /// Returns the plain description of this automaton.
    /// Building an automaton from the result yields an automaton equal to this one.
    pub fn components(&self) -> DfaComponents {
        DfaComponents {
            alphabet: self.alphabet.iter().collect(),
            states: self.states.iter().cloned().collect(),
            initial_state: self.initial_state().to_string(),
            final_states: self.final_states().map(str::to_string).collect(),
            rules: self
                .rules()
                .map(|(from, symbol, to)| {
                    (self.name(from).to_string(), symbol, self.name(to).to_string())
                })
                .collect(),
        }
    }
}

/// State identifiers are positions, so two automata are only equal if they declare the same states in the same order.
/// The order of rules and symbols does not matter.
impl PartialEq for Dfa {
    fn eq(&self, other: &Self) -> bool {
        self.states.iter().eq(other.states.iter())
            && self.alphabet == other.alphabet
            && self.initial == other.initial
            && self.finals == other.finals
            && self.rules == other.rules
            && self.limits == other.limits
    }
}

impl Eq for Dfa {}

impl TryFrom<DfaComponents> for Dfa {
    type Error = AutomatonError;

    fn try_from(components: DfaComponents) -> Result<Self, Self::Error> {
        Dfa::build_from(components)
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA {{")?;
        writeln!(f, "\tAlphabet: {}", self.alphabet)?;
        writeln!(f, "\tStates:")?;
        for q in self.states() {
            write!(f, "\t\t{}: ", self.name(q))?;
            for s in self.alphabet.iter() {
                if let Some(p) = self.next(q, s) {
                    write!(f, "{} -> {}, ", s, self.name(p))?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "\tInitial: {}", self.initial_state())?;
        writeln!(f, "\tFinals: {{{}}}", self.final_states().join(", "))?;
        writeln!(f, "}}")
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    fn components() -> DfaComponents {
        DfaComponents {
            alphabet: vec!['a', 'b'],
            states: vec!["s".into(), "t".into()],
            initial_state: "s".into(),
            final_states: vec!["t".into()],
            rules: vec![
                ("s".into(), 'a', "t".into()),
                ("t".into(), 'b', "s".into()),
            ],
        }
    }

    fn malformed(components: DfaComponents) -> Malformed {
        match Dfa::build_from(components) {
            Err(AutomatonError::InvalidAutomaton(m)) => m,
            other => panic!("expected an invalid automaton, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_construction() {
        let dfa = Dfa::build_from(components()).unwrap();
        assert_eq!(dfa.num_states(), 2);
        assert_eq!(dfa.num_transitions(), 2);
        assert_eq!(dfa.initial_state(), "s");
        assert_eq!(dfa.final_states().collect::<Vec<_>>(), vec!["t"]);
        assert_eq!(dfa.next(0, 'a'), Some(1));
        assert_eq!(dfa.next(0, 'b'), None);
        assert!(dfa.is_final(1));
        assert!(!dfa.is_final(0));
        assert!(!dfa.is_final(7));
    }

    #[test]
    fn test_duplicate_symbol() {
        let mut c = components();
        c.alphabet.push('a');
        assert_eq!(malformed(c), Malformed::DuplicateSymbol('a'));
    }

    #[test]
    fn test_duplicate_state() {
        let mut c = components();
        c.states.push("s".into());
        assert_eq!(malformed(c), Malformed::DuplicateState("s".into()));
    }

    #[test]
    fn test_unknown_initial_state() {
        let mut c = components();
        c.initial_state = "u".into();
        assert_eq!(malformed(c), Malformed::UnknownInitialState("u".into()));
    }

    #[test]
    fn test_no_states() {
        let c = DfaComponents {
            initial_state: "q0".into(),
            ..Default::default()
        };
        assert_eq!(malformed(c), Malformed::UnknownInitialState("q0".into()));
    }

    #[test]
    fn test_unknown_final_state() {
        let mut c = components();
        c.final_states.push("u".into());
        assert_eq!(malformed(c), Malformed::UnknownFinalState("u".into()));
    }

    #[test]
    fn test_unknown_rule_source() {
        let mut c = components();
        c.rules.push(("u".into(), 'a', "s".into()));
        assert_eq!(
            malformed(c),
            Malformed::UnknownRuleSource {
                state: "u".into(),
                symbol: 'a'
            }
        );
    }

    #[test]
    fn test_unknown_rule_target() {
        let mut c = components();
        c.rules.push(("t".into(), 'a', "u".into()));
        assert_eq!(
            malformed(c),
            Malformed::UnknownRuleTarget {
                state: "t".into(),
                symbol: 'a',
                target: "u".into()
            }
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let mut c = components();
        c.rules.push(("t".into(), 'c', "s".into()));
        assert_eq!(
            malformed(c),
            Malformed::UnknownSymbol {
                state: "t".into(),
                symbol: 'c'
            }
        );
    }

    #[test]
    fn test_conflicting_rule() {
        let mut c = components();
        c.rules.push(("s".into(), 'a', "s".into()));
        assert_eq!(
            malformed(c),
            Malformed::ConflictingRule {
                state: "s".into(),
                symbol: 'a',
                first: "t".into(),
                second: "s".into()
            }
        );
    }

    #[test]
    fn test_repeated_rule_is_tolerated() {
        let mut c = components();
        c.rules.push(("s".into(), 'a', "t".into()));
        let dfa = Dfa::build_from(c).unwrap();
        assert_eq!(dfa.num_transitions(), 2);
    }

    #[test]
    fn test_duplicate_final_states_are_merged() {
        let mut c = components();
        c.final_states.push("t".into());
        let dfa = Dfa::build_from(c).unwrap();
        assert_eq!(dfa.finals().count(), 1);
    }

    #[test]
    fn test_state_limit() {
        let limits = Limits {
            max_states: 1,
            ..Limits::default()
        };
        let result = Dfa::build_with_limits(components(), limits);
        assert_eq!(
            result,
            Err(AutomatonError::SizeLimitExceeded {
                resource: Resource::States,
                actual: 2,
                max: 1
            })
        );
    }

    #[test]
    fn test_symbol_limit() {
        let limits = Limits {
            max_symbols: 1,
            ..Limits::default()
        };
        let result = Dfa::build_with_limits(components(), limits);
        assert!(matches!(
            result,
            Err(AutomatonError::SizeLimitExceeded {
                resource: Resource::Symbols,
                ..
            })
        ));
    }

    #[test]
    fn test_components_roundtrip() {
        let dfa = fixtures::reference();
        let rebuilt = Dfa::try_from(dfa.components()).unwrap();
        assert_eq!(dfa, rebuilt);
        assert_eq!(dfa.components(), rebuilt.components());
    }

    #[test]
    fn test_equality_respects_state_names() {
        // same layout by index, but the names are swapped
        let ab = Dfa::new(['x'], ["a", "b"], "a", ["b"], [("a", 'x', "b")]).unwrap();
        let ba = Dfa::new(['x'], ["b", "a"], "b", ["a"], [("b", 'x', "a")]).unwrap();
        assert_ne!(ab, ba);
        assert_ne!(ab.components(), ba.components());

        // rule and symbol order are irrelevant
        let reordered = Dfa::new(
            ['b', 'a'],
            ["s", "t"],
            "s",
            ["t"],
            [("t", 'b', "s"), ("s", 'a', "t")],
        )
        .unwrap();
        assert_eq!(Dfa::build_from(components()).unwrap(), reordered);
    }

    #[test]
    fn test_unbounded_limits() {
        let n = Limits::default().max_states + 1;
        let states: Vec<String> = (0..n).map(|i| format!("q{}", i)).collect();
        let c = DfaComponents {
            alphabet: vec!['a'],
            initial_state: states[0].clone(),
            final_states: vec![states[n - 1].clone()],
            rules: states
                .iter()
                .zip(states.iter().skip(1))
                .map(|(from, to)| (from.clone(), 'a', to.clone()))
                .collect(),
            states,
        };
        assert!(matches!(
            Dfa::build_from(c.clone()),
            Err(AutomatonError::SizeLimitExceeded {
                resource: Resource::States,
                ..
            })
        ));
        let dfa = Dfa::build_with_limits(c, Limits::unbounded()).unwrap();
        assert_eq!(dfa.num_states(), n);
        assert_eq!(dfa.limits(), Limits::unbounded());
        assert!(dfa.accepts(&"a".repeat(n - 1)));
    }

    #[test]
    fn test_lookup_by_name() {
        let dfa = fixtures::reference();
        assert_eq!(dfa.state_id("q3"), Some(3));
        assert_eq!(dfa.state_id("q9"), None);
        assert_eq!(dfa.state_name(7), Some("q7"));
        assert_eq!(dfa.state_name(8), None);
    }

    #[test]
    fn test_missing_transitions() {
        let dfa = Dfa::build_from(components()).unwrap();
        assert!(!dfa.is_complete());
        assert_eq!(
            dfa.missing_transitions().collect::<Vec<_>>(),
            vec![(0, 'b'), (1, 'a')]
        );
        assert!(fixtures::reference().is_complete());
    }

    #[test]
    fn test_edges_group_symbols() {
        let dfa = fixtures::reference();
        let edges = dfa.edges();
        let q3_q5 = edges.iter().find(|e| e.from == 3 && e.to == 5).unwrap();
        assert_eq!(q3_q5.symbols, vec!['a', 'b']);
        assert_eq!(q3_q5.label(), "a, b");
        assert!(!q3_q5.is_loop());
        let q5_q5 = edges.iter().find(|e| e.from == 5 && e.to == 5).unwrap();
        assert!(q5_q5.is_loop());
        // 16 rules, three pairs of them share source and target
        assert_eq!(edges.len(), 13);
        assert_eq!(edges[0].from, 0);
        assert_eq!(edges[0].to, 1);
    }

    #[test]
    fn test_display() {
        let dfa = Dfa::build_from(components()).unwrap();
        let shown = dfa.to_string();
        assert!(shown.contains("Alphabet: {a, b}"));
        assert!(shown.contains("s: a -> t, "));
        assert!(shown.contains("Initial: s"));
        assert!(shown.contains("Finals: {t}"));
    }
}
