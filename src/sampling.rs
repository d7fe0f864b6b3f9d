use std::collections::VecDeque;

use bit_set::BitSet;
use rand::{rng, seq::IteratorRandom, Rng};

use crate::{
    alphabet::Symbol,
    automata::{Dfa, StateId},
};

/// The result of sampling from an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SampleResult {
    /// Found a word in the language
    Sampled(String),
    /// The language tried to sample from is empty
    Empty,
    /// Maximum depth was reached without finding a word.
    MaxDepth,
}

impl SampleResult {
    /// Unwraps the sampled word.
    /// Panics if the sampling was not successful.
    pub fn unwrap(self) -> String {
        match self {
            SampleResult::Sampled(s) => s,
            _ => panic!("called `unwrap` on empty value"),
        }
    }

    /// Return true if sampling was successful and this result carries a value.
    /// Otherwise returns false.
    pub fn success(&self) -> bool {
        matches!(self, SampleResult::Sampled(_))
    }
}

/// Returns the states from which some goal state can be reached, including the goal states themselves.
fn live_states(dfa: &Dfa, goal: impl Fn(StateId) -> bool) -> BitSet {
    let mut preds: Vec<Vec<StateId>> = vec![Vec::new(); dfa.num_states()];
    for (from, _, to) in dfa.rules() {
        preds[to].push(from);
    }

    let mut live = BitSet::with_capacity(dfa.num_states());
    let mut queue: VecDeque<StateId> = dfa.states().filter(|&q| goal(q)).collect();
    for &q in queue.iter() {
        live.insert(q);
    }
    while let Some(q) = queue.pop_front() {
        for &p in &preds[q] {
            if live.insert(p) {
                queue.push_back(p);
            }
        }
    }
    live
}

/// Tries to sample a word that is accepted by the automaton.
/// The function performs a random walk from the initial state that only enters states from which an accepting state is still reachable,
/// and aborts if no word is found after `max_depth` steps.
/// If `comp` is set to `true`, the function will return a word that is rejected by the automaton instead,
/// either because it ends in a non-final state or because it runs into a missing transition.
///
/// Alphabets containing whitespace symbols may yield words whose leading or trailing whitespace is trimmed during validation.
pub fn sample(dfa: &Dfa, max_depth: usize, comp: bool) -> SampleResult {
    let missing = |q: StateId| dfa.alphabet().iter().find(|&s| dfa.next(q, s).is_none());
    let done = |q: StateId| dfa.is_final(q) != comp;
    let live = live_states(dfa, |q| done(q) || (comp && missing(q).is_some()));
    if !live.contains(dfa.initial()) {
        return SampleResult::Empty;
    }

    let mut rng = rng();
    let mut word = String::new();
    let mut q = dfa.initial();
    let mut depth = 0;
    loop {
        let moves: Vec<(Symbol, StateId)> = dfa
            .alphabet()
            .iter()
            .filter_map(|s| dfa.next(q, s).map(|p| (s, p)))
            .filter(|&(_, p)| live.contains(p))
            .collect();

        // at the maximum depth the walk finishes wherever it can
        let finish = moves.is_empty() || depth >= max_depth;
        if done(q) && (finish || rng.random_bool(0.5)) {
            return SampleResult::Sampled(word);
        }
        if comp {
            if let Some(s) = missing(q) {
                if finish || rng.random_bool(0.5) {
                    word.push(s);
                    return SampleResult::Sampled(word);
                }
            }
        }
        if depth >= max_depth {
            return SampleResult::MaxDepth;
        }
        match moves.into_iter().choose(&mut rng) {
            Some((s, p)) => {
                word.push(s);
                q = p;
                depth += 1;
            }
            // every live state is done or has a live successor
            None => return SampleResult::Empty,
        }
    }
}
