//! Deterministic finite automata with traced validation and minimization.
//!
//! The crate provides an immutable [Dfa](automata::Dfa) over single-character symbols together with
//!
//! - validation of words that records the visited states and taken transitions,
//! - removal of states that are not reachable from the initial state,
//! - completion of a partial transition function with a sink state, and
//! - minimization by the table-filling algorithm, split into a mark and a reduce phase.
//!
//! Every derived automaton is built from plain [DfaComponents](automata::DfaComponents) through the same checks as a hand-written one,
//! so the stages compose freely.
//!
//! ```
//! use dfa_min::automata::Dfa;
//!
//! let dfa = Dfa::new(
//!     ['0', '1'],
//!     ["q0", "q1", "q2"],
//!     "q0",
//!     ["q1", "q2"],
//!     [
//!         ("q0", '0', "q0"),
//!         ("q0", '1', "q1"),
//!         ("q1", '0', "q2"),
//!         ("q1", '1', "q1"),
//!         ("q2", '0', "q2"),
//!         ("q2", '1', "q1"),
//!     ],
//! )
//! .unwrap();
//!
//! let (minimal, changed) = dfa.prune_and_minimize().unwrap();
//! assert!(changed);
//! assert_eq!(minimal.num_states(), 2);
//! assert_eq!(minimal.state_names().collect::<Vec<_>>(), vec!["q0", "q1, q2"]);
//! assert_eq!(dfa.accepts("0010"), minimal.accepts("0010"));
//! ```

pub mod alphabet;
pub mod automata;

#[cfg(feature = "sampling")]
pub mod sampling;

pub use alphabet::{Alphabet, Symbol};
pub use automata::{AutomatonError, Dfa, DfaComponents};
