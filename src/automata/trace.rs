//! Validation of words with a record of the path taken through the automaton.

use indexmap::{IndexMap, IndexSet};
use log::trace;

use crate::alphabet::Symbol;

use super::{Dfa, Edge, StateId};

/// The states and transitions visited while validating a single word.
/// A trace always contains the initial state, even if no symbol was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    visited_states: IndexSet<StateId>,
    visited_transitions: IndexMap<(StateId, Symbol), StateId>,
    consumed: usize,
}

impl Trace {
    fn seeded(initial: StateId) -> Self {
        let mut visited_states = IndexSet::new();
        visited_states.insert(initial);
        Self {
            visited_states,
            visited_transitions: IndexMap::new(),
            consumed: 0,
        }
    }

    /// Records a taken transition. Revisiting states or transitions adds nothing.
    fn record(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.visited_states.insert(from);
        self.visited_states.insert(to);
        self.visited_transitions.entry((from, symbol)).or_insert(to);
        self.consumed += 1;
    }

    /// Returns the visited states in the order they were first reached.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.visited_states.iter().copied()
    }

    /// Returns the taken transitions as `(source, symbol, target)` in the order they were first taken.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.visited_transitions
            .iter()
            .map(|(&(from, symbol), &to)| (from, symbol, to))
    }

    /// Returns true if the state was visited.
    pub fn contains_state(&self, state: StateId) -> bool {
        self.visited_states.contains(&state)
    }

    /// Returns true if the transition from `state` on `symbol` was taken.
    pub fn contains_transition(&self, state: StateId, symbol: Symbol) -> bool {
        self.visited_transitions.contains_key(&(state, symbol))
    }

    /// Returns true if any of the transitions grouped into the edge was taken.
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        edge.symbols
            .iter()
            .any(|&s| self.contains_transition(edge.from, s))
    }

    /// The number of symbols consumed before validation stopped.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Why a word was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The word drives the automaton into a final state.
    Accepted,
    /// The word contains a symbol outside the alphabet.
    SyntaxError,
    /// The automaton has no transition from `state` on `symbol`.
    NoTransition { state: StateId, symbol: Symbol },
    /// The whole word was consumed, but the reached state is not final.
    NotAccepting(StateId),
}

/// The result of validating a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    verdict: Verdict,
    trace: Trace,
}

impl Validation {
    /// Returns true if the word was accepted.
    pub fn accepted(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted)
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }
}

impl Dfa {
    /// Checks whether every symbol of the input, after trimming leading and trailing whitespace, is in the alphabet.
    /// Does not consider the transitions of the automaton.
    pub fn check_syntax(&self, input: &str) -> bool {
        self.alphabet.is_word(input)
    }

    /// Runs the input through the automaton and records the visited states and taken transitions.
    ///
    /// Leading and trailing whitespace is ignored.
    /// The input is rejected without consuming anything if it contains a symbol outside the alphabet,
    /// and rejected as soon as a symbol has no transition from the current state.
    /// The empty word is accepted iff the initial state is final.
    ///
    /// Every call starts from a fresh trace, nothing is kept on the automaton.
    ///
    /// # Example
    /// ```
    /// use dfa_min::automata::{Dfa, Verdict};
    ///
    /// let dfa = Dfa::new(['a'], ["even", "odd"], "even", ["even"], [("even", 'a', "odd"), ("odd", 'a', "even")]).unwrap();
    /// let result = dfa.validate("aaa");
    /// assert!(!result.accepted());
    /// assert_eq!(result.verdict(), Verdict::NotAccepting(1));
    /// assert_eq!(result.trace().transitions().count(), 2);
    /// ```
    pub fn validate(&self, input: &str) -> Validation {
        let mut trace = Trace::seeded(self.initial);
        if !self.check_syntax(input) {
            return Validation {
                verdict: Verdict::SyntaxError,
                trace,
            };
        }

        let mut current = self.initial;
        for symbol in input.trim().chars() {
            match self.next(current, symbol) {
                Some(dest) => {
                    trace!("{} --{}--> {}", self.name(current), symbol, self.name(dest));
                    trace.record(current, symbol, dest);
                    current = dest;
                }
                None => {
                    trace!("no transition from {} on {}", self.name(current), symbol);
                    return Validation {
                        verdict: Verdict::NoTransition {
                            state: current,
                            symbol,
                        },
                        trace,
                    };
                }
            }
        }

        let verdict = if self.is_final(current) {
            Verdict::Accepted
        } else {
            Verdict::NotAccepting(current)
        };
        Validation { verdict, trace }
    }

    /// Returns if the automaton accepts the given input.
    pub fn accepts(&self, input: &str) -> bool {
        self.validate(input).accepted()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::super::fixtures;
    use super::*;

    fn partial() -> Dfa {
        // q0 --a--> q1 --b--> q2*, q2 --a--> q1
        Dfa::new(
            ['a', 'b'],
            ["q0", "q1", "q2"],
            "q0",
            ["q2"],
            [("q0", 'a', "q1"), ("q1", 'b', "q2"), ("q2", 'a', "q1")],
        )
        .unwrap()
    }

    #[test]
    fn test_accept_and_trace() {
        let dfa = partial();
        let result = dfa.validate("abab");
        assert!(result.accepted());
        assert_eq!(result.verdict(), Verdict::Accepted);
        let trace = result.trace();
        assert_eq!(trace.states().collect::<Vec<_>>(), vec![0, 1, 2]);
        // the loop between q1 and q2 is recorded once
        assert_eq!(
            trace.transitions().collect::<Vec<_>>(),
            vec![(0, 'a', 1), (1, 'b', 2), (2, 'a', 1)]
        );
        assert_eq!(trace.consumed(), 4);
    }

    #[test]
    fn test_missing_transition_rejects() {
        let dfa = partial();
        let result = dfa.validate("abb");
        assert!(!result.accepted());
        assert_eq!(
            result.verdict(),
            Verdict::NoTransition {
                state: 2,
                symbol: 'b'
            }
        );
        assert_eq!(result.trace().consumed(), 2);
        assert!(!result.trace().contains_transition(2, 'b'));
    }

    #[test]
    fn test_stops_at_first_missing_transition() {
        let dfa = partial();
        let result = dfa.validate("babab");
        assert_eq!(
            result.verdict(),
            Verdict::NoTransition {
                state: 0,
                symbol: 'b'
            }
        );
        assert_eq!(result.trace().states().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_syntax_error() {
        let dfa = partial();
        assert!(!dfa.check_syntax("abc"));
        let result = dfa.validate("abc");
        assert_eq!(result.verdict(), Verdict::SyntaxError);
        assert_eq!(result.trace().states().collect::<Vec<_>>(), vec![0]);
        assert_eq!(result.trace().transitions().count(), 0);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let dfa = partial();
        assert!(dfa.accepts("  ab\n"));
        assert_eq!(dfa.validate("a b").verdict(), Verdict::SyntaxError);
    }

    #[test]
    fn test_empty_word() {
        let dfa = partial();
        assert_eq!(dfa.validate("").verdict(), Verdict::NotAccepting(0));
        assert!(fixtures::twins().accepts("   "));
    }

    #[test]
    fn test_traces_are_independent() {
        let dfa = partial();
        let first = dfa.validate("ab");
        let second = dfa.validate("a");
        assert!(first.trace().contains_state(2));
        assert!(!second.trace().contains_state(2));
        assert!(!second.accepted());
    }

    #[test]
    fn test_trace_highlights_edges() {
        let dfa = fixtures::reference();
        let result = dfa.validate("aab");
        assert!(result.accepted());
        let taken: Vec<_> = dfa
            .edges()
            .into_iter()
            .filter(|e| result.trace().contains_edge(e))
            .map(|e| (e.from, e.to))
            .collect();
        assert_eq!(taken, vec![(0, 1), (1, 3), (3, 5)]);
    }

    #[quickcheck]
    fn syntax_error_always_rejects(dfa: Dfa, word: String) -> bool {
        dfa.check_syntax(&word) || !dfa.validate(&word).accepted()
    }

    #[quickcheck]
    fn empty_word_accepted_iff_initial_final(dfa: Dfa) -> bool {
        dfa.accepts("") == dfa.is_final(dfa.initial())
    }

    #[quickcheck]
    fn trace_is_seeded_with_initial(dfa: Dfa, word: String) -> bool {
        dfa.validate(&word).trace().contains_state(dfa.initial())
    }
}
