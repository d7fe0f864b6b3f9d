//! Errors reported by construction and minimization of automata.

use std::fmt::Display;

use thiserror::Error;

use crate::alphabet::Symbol;

/// The ways in which a description of an automaton can violate the invariants of a [Dfa](super::Dfa).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("symbol '{0}' occurs more than once in the alphabet")]
    DuplicateSymbol(Symbol),
    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),
    #[error("initial state '{0}' is not a declared state")]
    UnknownInitialState(String),
    #[error("final state '{0}' is not a declared state")]
    UnknownFinalState(String),
    #[error("transition on '{symbol}' starts in undeclared state '{state}'")]
    UnknownRuleSource { state: String, symbol: Symbol },
    #[error("transition from '{state}' on '{symbol}' leads to undeclared state '{target}'")]
    UnknownRuleTarget {
        state: String,
        symbol: Symbol,
        target: String,
    },
    #[error("transition from '{state}' uses symbol '{symbol}' which is not in the alphabet")]
    UnknownSymbol { state: String, symbol: Symbol },
    /// Two transitions share the same source and symbol but lead to different states.
    #[error("state '{state}' has transitions on '{symbol}' to both '{first}' and '{second}'")]
    ConflictingRule {
        state: String,
        symbol: Symbol,
        first: String,
        second: String,
    },
}

/// The resource that is bounded by [Limits](super::Limits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    States,
    Symbols,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::States => write!(f, "state"),
            Resource::Symbols => write!(f, "symbol"),
        }
    }
}

/// Errors produced by operations on deterministic finite automata.
/// Validating a word never fails, rejection is reported through the [Verdict](super::Verdict) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The description of the automaton violates an invariant.
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(#[from] Malformed),

    /// Minimization requires a transition for every state and symbol.
    #[error("incomplete automaton: no transition from '{state}' on '{symbol}'")]
    IncompleteAutomaton { state: String, symbol: Symbol },

    /// Two states of one equivalence class disagree on the class of a successor.
    /// This never happens for a table produced by [mark](super::Dfa::mark) on the same automaton.
    #[error("inconsistent merge: class '{class}' leads to both '{first}' and '{second}' on '{symbol}'")]
    InconsistentMerge {
        class: String,
        symbol: Symbol,
        first: String,
        second: String,
    },

    #[error("{resource} count {actual} exceeds the limit of {max}")]
    SizeLimitExceeded {
        resource: Resource,
        actual: usize,
        max: usize,
    },

    /// A distinguishability table was applied to an automaton with a different number of states.
    #[error("distinguishability table covers {table} states but the automaton has {automaton}")]
    TableMismatch { table: usize, automaton: usize },
}
