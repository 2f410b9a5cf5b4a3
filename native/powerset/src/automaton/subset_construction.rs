//! Subset construction algorithm for converting ε-NFA to DFA.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::automaton::dfa::Dfa;
use crate::automaton::epsilon_nfa::Nfa;
use crate::automaton::state::{StateId, StateNames, StateSet};
use crate::automaton::symbol::SymbolId;
use crate::automaton::view::Automaton;

/// Name given to the synthetic sink state.
pub const DEAD_STATE_NAME: &str = "DEAD";

/// Name of the DFA state discovered in position `index`.
pub fn subset_state_name(index: usize) -> String {
    format!("S{index}")
}

/// Convert an epsilon-NFA to an equivalent DFA using the powerset construction.
///
/// Every reachable set of NFA states becomes one DFA state named `S0`, `S1`, …
/// in discovery order, `S0` being the epsilon closure of the NFA start state.
/// Whenever some reachable subset has no move on a symbol, a single non-final
/// [`DEAD_STATE_NAME`] state absorbing every symbol takes that transition, so
/// the result is total.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    // Each DFA state corresponds to a set of NFA states, keyed by exact set equality
    let mut state_mapping: IndexMap<StateSet, StateId> = IndexMap::new();
    let mut transitions: HashMap<(StateId, SymbolId), StateId> = HashMap::new();
    let mut dead_needed: Vec<(StateId, SymbolId)> = Vec::new();

    let initial_set = nfa.initial_states();
    state_mapping.insert(initial_set.clone(), 0);

    // LIFO worklist; the order only affects naming
    let mut worklist: Vec<StateSet> = vec![initial_set];

    while let Some(current_nfa_set) = worklist.pop() {
        let current_dfa_state = state_mapping[&current_nfa_set];

        for symbol in nfa.alphabet().ids() {
            let reached = nfa.move_on_symbol(&current_nfa_set, symbol);
            let next_nfa_set = nfa.epsilon_closure(&reached);

            if next_nfa_set.is_empty() {
                dead_needed.push((current_dfa_state, symbol));
                continue;
            }

            let next_dfa_state = match state_mapping.get(&next_nfa_set) {
                Some(&existing) => existing,
                None => {
                    let new_state = state_mapping.len() as StateId;
                    state_mapping.insert(next_nfa_set.clone(), new_state);
                    worklist.push(next_nfa_set);
                    new_state
                }
            };

            transitions.insert((current_dfa_state, symbol), next_dfa_state);
        }
    }

    let mut states = StateNames::default();
    let mut final_states = StateSet::with_capacity(state_mapping.len() + 1);
    let mut inverse_mapping: HashMap<StateId, Vec<StateId>> = HashMap::new();
    for (index, (nfa_states, &dfa_state)) in state_mapping.iter().enumerate() {
        debug_assert_eq!(index as StateId, dfa_state);
        states.intern(&subset_state_name(index));
        if nfa_states.intersects(nfa.final_states()) {
            final_states.insert(dfa_state);
        }
        inverse_mapping.insert(dfa_state, nfa_states.to_vec());
    }

    let dead_state = if dead_needed.is_empty() {
        None
    } else {
        let dead = states.intern(DEAD_STATE_NAME);
        for (source, symbol) in dead_needed {
            transitions.insert((source, symbol), dead);
        }
        for symbol in nfa.alphabet().ids() {
            transitions.insert((dead, symbol), dead);
        }
        Some(dead)
    };

    Dfa::from_parts(
        states,
        nfa.alphabet().clone(),
        0,
        final_states,
        transitions,
        dead_state,
        Some(inverse_mapping),
    )
}

impl Nfa {
    /// Convert this NFA into an equivalent DFA; see [`subset_construction`].
    pub fn to_dfa(&self) -> Dfa {
        subset_construction(self)
    }
}
