//! Finite automata over named states and symbols.
//!
//! This module provides epsilon-NFA and DFA implementations with:
//! - Epsilon closure computation
//! - Subset construction (NFA to DFA conversion) with an explicit dead state
//! - Exact-match acceptance for both kinds
//! - A caller-owned cursor for step-wise DFA runs

mod builder;
mod cursor;
mod dfa;
mod epsilon_nfa;
mod error;
#[cfg(feature = "python")]
mod python_bindings;
mod state;
mod subset_construction;
mod symbol;
mod view;

pub use cursor::{ExecutionCursor, Step};
pub use dfa::{Dfa, DfaBuilder};
pub use epsilon_nfa::{Nfa, NfaBuilder};
pub use error::{AutomatonError, MalformedAutomaton};
#[cfg(feature = "python")]
pub use python_bindings::automaton;
pub use state::{Iter as StateSetIter, StateId, StateNames, StateSet};
pub use subset_construction::{DEAD_STATE_NAME, subset_construction, subset_state_name};
pub use symbol::{Alphabet, EPSILON, EPSILON_NAME, SymbolId, is_epsilon, split_symbols};
pub use view::Automaton;
