//! Declarations common to both automaton builders.

use crate::automaton::error::MalformedAutomaton;
use crate::automaton::state::{StateId, StateNames, StateSet};
use crate::automaton::symbol::{Alphabet, EPSILON, EPSILON_NAME, SymbolId};

/// States, alphabet, start and final states as the caller spelled them.
#[derive(Debug, Clone, Default)]
pub(crate) struct Declarations {
    pub(crate) states: Vec<String>,
    pub(crate) alphabet: Vec<String>,
    pub(crate) start_state: Option<String>,
    pub(crate) final_states: Vec<String>,
    /// Transition rows named by the caller, even those without targets.
    pub(crate) rows: Vec<(String, Vec<String>)>,
}

/// Validated and interned declarations.
pub(crate) struct Interned {
    pub(crate) states: StateNames,
    pub(crate) alphabet: Alphabet,
    pub(crate) start_state: StateId,
    pub(crate) final_states: StateSet,
}

impl Interned {
    /// Resolve the endpoints and label of one transition. The epsilon marker
    /// maps to [`EPSILON`]; every other label must be declared.
    pub(crate) fn edge(
        &self,
        source: &str,
        symbol: &str,
        destination: &str,
    ) -> Result<(StateId, SymbolId, StateId), MalformedAutomaton> {
        let src = self.states.require(source)?;
        let dst = self.states.require(destination)?;
        let sym = self.label(source, symbol)?;
        Ok((src, sym, dst))
    }

    /// Resolve a transition label of `source`; the epsilon marker maps to
    /// [`EPSILON`].
    pub(crate) fn label(
        &self,
        source: &str,
        symbol: &str,
    ) -> Result<SymbolId, MalformedAutomaton> {
        if symbol == EPSILON_NAME {
            return Ok(EPSILON);
        }
        self.alphabet
            .id(symbol)
            .ok_or_else(|| MalformedAutomaton::UndeclaredSymbol {
                state: source.to_owned(),
                symbol: symbol.to_owned(),
            })
    }

    /// Check every declared row, returning the resolved labels.
    pub(crate) fn rows<'d>(
        &self,
        declarations: &'d Declarations,
    ) -> Result<Vec<(&'d str, SymbolId)>, MalformedAutomaton> {
        let mut labels = Vec::new();
        for (state, symbols) in &declarations.rows {
            self.states.require(state)?;
            for symbol in symbols {
                labels.push((state.as_str(), self.label(state, symbol)?));
            }
        }
        Ok(labels)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.states.len()
    }
}

impl Declarations {
    pub(crate) fn intern(&self) -> Result<Interned, MalformedAutomaton> {
        let mut states = StateNames::default();
        for name in &self.states {
            states.insert(name)?;
        }

        let mut alphabet = Alphabet::default();
        for name in &self.alphabet {
            alphabet.insert(name)?;
        }

        let start_state = match &self.start_state {
            Some(name) => states.require(name)?,
            None => return Err(MalformedAutomaton::MissingStart),
        };

        let mut final_states = StateSet::with_capacity(states.len());
        for name in &self.final_states {
            final_states.insert(states.require(name)?);
        }

        Ok(Interned {
            states,
            alphabet,
            start_state,
            final_states,
        })
    }
}
