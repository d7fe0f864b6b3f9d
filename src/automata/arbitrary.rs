//! Random automata for property based testing.

use quickcheck::{Arbitrary, Gen};

use super::Dfa;

const SYMBOLS: [char; 3] = ['a', 'b', 'c'];
const MAX_STATES: usize = 8;

fn pick(states: &[String], g: &mut Gen) -> String {
    states[usize::arbitrary(g) % states.len()].clone()
}

/// Generates complete automata with one to three symbols and one to eight states named `q0`, `q1`, ...
/// Initial state, final states and transition targets are chosen at random, so generated automata may contain unreachable and equivalent states.
impl Arbitrary for Dfa {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_symbols = 1 + usize::arbitrary(g) % SYMBOLS.len();
        let num_states = 1 + usize::arbitrary(g) % MAX_STATES;
        let states: Vec<String> = (0..num_states).map(|i| format!("q{}", i)).collect();

        let initial = pick(&states, g);
        let finals: Vec<String> = states
            .iter()
            .filter(|_| bool::arbitrary(g))
            .cloned()
            .collect();
        let mut rules = Vec::with_capacity(num_states * num_symbols);
        for q in states.iter() {
            for &s in &SYMBOLS[..num_symbols] {
                rules.push((q.clone(), s, pick(&states, g)));
            }
        }

        // every reference above is to a declared state or symbol
        Dfa::new(
            SYMBOLS[..num_symbols].iter().copied(),
            states.iter().cloned(),
            initial,
            finals,
            rules,
        )
        .expect("generated automaton is well-formed")
    }
}
