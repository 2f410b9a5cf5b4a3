//! Read-only view shared by [`Nfa`](crate::automaton::Nfa) and
//! [`Dfa`](crate::automaton::Dfa).

use crate::automaton::state::{StateId, StateNames, StateSet};
use crate::automaton::symbol::{Alphabet, SymbolId};

/// Structural access to an automaton. The two kinds differ only in how many
/// targets a `(state, symbol)` pair may have.
pub trait Automaton {
    /// Targets of one `(state, symbol)` pair: zero or one for a DFA, any
    /// number for an NFA.
    type Targets<'a>: IntoIterator<Item = StateId>
    where
        Self: 'a;

    /// Whether every `(state, symbol)` pair has at most one target.
    const DETERMINISTIC: bool;

    fn states(&self) -> &StateNames;

    fn alphabet(&self) -> &Alphabet;

    fn start_state(&self) -> StateId;

    fn final_states(&self) -> &StateSet;

    fn targets(&self, state: StateId, symbol: SymbolId) -> Self::Targets<'_>;

    /// Symbols that label transitions, in table order. Defaults to the
    /// alphabet; automata with epsilon moves append the epsilon marker.
    fn transition_symbols(&self) -> Vec<SymbolId> {
        self.alphabet().ids().collect()
    }

    fn is_final(&self, state: StateId) -> bool {
        self.final_states().contains(state)
    }

    fn state_name(&self, state: StateId) -> &str {
        self.states().name(state)
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        self.alphabet().name(symbol).unwrap_or("?")
    }
}
