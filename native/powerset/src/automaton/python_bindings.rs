//! PyO3 bindings for the automaton module.
//!
//! States and symbols cross the boundary as Python strings.

use std::fmt::Display;

use indexmap::IndexMap;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyString;

use crate::automaton::dfa::Dfa;
use crate::automaton::epsilon_nfa::{Nfa, NfaBuilder};
use crate::automaton::symbol::{Alphabet, SymbolId, split_symbols};
use crate::automaton::view::Automaton;
use crate::loader::{self, AutomatonKind, LoadedAutomaton};
use crate::render::DfaSnapshot;
use crate::table::TransitionTable;

fn value_error(err: impl Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Accept either a string (one symbol per character) or a sequence of symbols.
fn input_symbols(input: &Bound<'_, PyAny>) -> PyResult<Vec<String>> {
    if let Ok(text) = input.downcast::<PyString>() {
        return Ok(split_symbols(text.to_str()?));
    }
    input.extract()
}

/// Look up a single symbol, outside of any input string.
fn symbol_id(alphabet: &Alphabet, symbol: &str) -> Result<SymbolId, String> {
    alphabet
        .id(symbol)
        .ok_or_else(|| format!("symbol '{symbol}' is not in the alphabet"))
}

fn sorted_names<A: Automaton>(automaton: &A, states: impl IntoIterator<Item = u32>) -> Vec<String> {
    let mut names: Vec<String> = states
        .into_iter()
        .map(|s| automaton.state_name(s).to_owned())
        .collect();
    names.sort_unstable();
    names
}

/// An Epsilon Non-deterministic Finite Automaton.
#[pyclass(name = "Nfa", module = "powerset", frozen)]
pub struct PyNfa {
    nfa: Nfa,
}

#[pymethods]
impl PyNfa {
    /// Transitions map state -> symbol -> list of targets; "ε" marks epsilon moves.
    #[new]
    #[pyo3(signature = (states, alphabet, transition, start_state, final_states))]
    fn new(
        states: Vec<String>,
        alphabet: Vec<String>,
        transition: IndexMap<String, IndexMap<String, Vec<String>>>,
        start_state: String,
        final_states: Vec<String>,
    ) -> PyResult<Self> {
        let mut builder = NfaBuilder::new();
        builder
            .add_states(states)
            .add_symbols(alphabet)
            .set_start_state(start_state)
            .add_final_states(final_states);
        for (source, row) in &transition {
            for (symbol, targets) in row {
                for target in targets {
                    builder.add_transition(source, symbol, target);
                }
            }
        }
        let nfa = builder.build().map_err(value_error)?;
        Ok(Self { nfa })
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        match loader::load_str(json, Some(AutomatonKind::Nfa)).map_err(value_error)? {
            LoadedAutomaton::Nfa(nfa) => Ok(Self { nfa }),
            LoadedAutomaton::Dfa(_) => Err(PyValueError::new_err("expected an NFA document")),
        }
    }

    fn accepts(&self, input: &Bound<'_, PyAny>) -> PyResult<bool> {
        self.nfa.accepts(input_symbols(input)?).map_err(value_error)
    }

    /// Epsilon closure of the named states, as sorted names.
    fn epsilon_closure(&self, states: Vec<String>) -> PyResult<Vec<String>> {
        let ids = states
            .iter()
            .map(|name| {
                self.nfa
                    .state(name)
                    .ok_or_else(|| PyValueError::new_err(format!("unknown state '{name}'")))
            })
            .collect::<PyResult<Vec<_>>>()?;
        let closure = self.nfa.epsilon_closure(&self.nfa.state_set(ids));
        Ok(sorted_names(&self.nfa, &closure))
    }

    fn to_dfa(&self) -> PyDfa {
        PyDfa {
            dfa: self.nfa.to_dfa(),
        }
    }

    fn table(&self) -> String {
        TransitionTable::new(&self.nfa).to_string()
    }

    fn to_json(&self) -> PyResult<String> {
        loader::to_json(&self.nfa).map_err(value_error)
    }

    fn __repr__(&self) -> String {
        format!(
            "Nfa(states={}, alphabet={})",
            self.nfa.states().len(),
            self.nfa.alphabet().len()
        )
    }
}

/// A Deterministic Finite Automaton.
#[pyclass(name = "Dfa", module = "powerset", frozen)]
pub struct PyDfa {
    dfa: Dfa,
}

#[pymethods]
impl PyDfa {
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        match loader::load_str(json, Some(AutomatonKind::Dfa)).map_err(value_error)? {
            LoadedAutomaton::Dfa(dfa) => Ok(Self { dfa }),
            LoadedAutomaton::Nfa(_) => Err(PyValueError::new_err("expected a DFA document")),
        }
    }

    fn accepts(&self, input: &Bound<'_, PyAny>) -> PyResult<bool> {
        self.dfa.accepts(input_symbols(input)?).map_err(value_error)
    }

    #[getter]
    fn start_state(&self) -> String {
        self.dfa.state_name(self.dfa.start_state()).to_owned()
    }

    #[getter]
    fn final_states(&self) -> Vec<String> {
        sorted_names(&self.dfa, self.dfa.final_states())
    }

    #[getter]
    fn states(&self) -> Vec<String> {
        sorted_names(&self.dfa, self.dfa.states().ids())
    }

    /// Single-step lookup; `None` when the state has no move on `symbol`.
    fn transition(&self, state: &str, symbol: &str) -> PyResult<Option<String>> {
        let source = self
            .dfa
            .state(state)
            .ok_or_else(|| PyValueError::new_err(format!("unknown state '{state}'")))?;
        let symbol = symbol_id(self.dfa.alphabet(), symbol).map_err(PyValueError::new_err)?;
        Ok(self
            .dfa
            .transition(source, symbol)
            .map(|target| self.dfa.state_name(target).to_owned()))
    }

    fn table(&self) -> String {
        TransitionTable::new(&self.dfa).to_string()
    }

    #[pyo3(signature = (highlight_edges=None, highlight_states=None))]
    fn to_dot(
        &self,
        highlight_edges: Option<Vec<(String, String)>>,
        highlight_states: Option<Vec<String>>,
    ) -> String {
        let dfa = &self.dfa;
        let edges = highlight_edges
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(state, symbol)| Some((dfa.state(&state)?, dfa.alphabet().id(&symbol)?)));
        let states = highlight_states
            .unwrap_or_default()
            .into_iter()
            .filter_map(|state| dfa.state(&state));
        DfaSnapshot::new(dfa)
            .highlight_edges(edges)
            .highlight_states(states)
            .to_dot()
    }

    fn to_json(&self) -> PyResult<String> {
        loader::to_json(&self.dfa).map_err(value_error)
    }

    fn __repr__(&self) -> String {
        format!(
            "Dfa(states={}, alphabet={})",
            self.dfa.states().len(),
            self.dfa.alphabet().len()
        )
    }
}

/// Register the automaton classes.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNfa>()?;
    m.add_class::<PyDfa>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup_has_no_position() {
        let mut alphabet = Alphabet::default();
        alphabet.insert("a").unwrap();

        assert_eq!(symbol_id(&alphabet, "a"), Ok(0));
        let message = symbol_id(&alphabet, "b").unwrap_err();
        assert_eq!(message, "symbol 'b' is not in the alphabet");
        assert!(!message.contains("position"));
    }
}
