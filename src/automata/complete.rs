//! Completion of a partial transition function with a sink state.

use log::debug;

use super::{AutomatonError, Dfa, Malformed};

impl Dfa {
    /// Makes the transition function total.
    ///
    /// Adds a non-accepting state named `sink` with a loop on every symbol and routes every missing transition to it.
    /// If the automaton is already complete, a copy is returned and the flag is false.
    /// Fails with [Malformed::DuplicateState] if `sink` is already the identifier of a state and a sink is needed.
    /// The language of the automaton is unchanged.
    pub fn complete(&self, sink: &str) -> Result<(Dfa, bool), AutomatonError> {
        let missing: Vec<_> = self.missing_transitions().collect();
        if missing.is_empty() {
            return Ok((self.clone(), false));
        }
        if self.state_id(sink).is_some() {
            return Err(Malformed::DuplicateState(sink.to_string()).into());
        }
        debug!(
            "completing with sink '{}' for {} missing transitions",
            sink,
            missing.len()
        );

        let mut components = self.components();
        components.states.push(sink.to_string());
        components.rules.extend(
            missing
                .into_iter()
                .map(|(q, s)| (self.name(q).to_string(), s, sink.to_string())),
        );
        components.rules.extend(
            self.alphabet
                .iter()
                .map(|s| (sink.to_string(), s, sink.to_string())),
        );
        Ok((self.derive(components)?, true))
    }
}
