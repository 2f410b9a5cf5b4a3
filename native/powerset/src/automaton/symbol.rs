//! Symbol types for automata transitions.

use indexmap::IndexSet;

use crate::automaton::error::{AutomatonError, MalformedAutomaton};

/// A symbol identifier: the index of the symbol in its [`Alphabet`].
/// The special value `EPSILON` represents an epsilon (empty) transition.
pub type SymbolId = u32;

/// Special symbol ID representing epsilon (empty) transitions.
/// We use u32::MAX as the epsilon marker.
pub const EPSILON: SymbolId = u32::MAX;

/// Spelling of the epsilon marker in transition tables and documents.
pub const EPSILON_NAME: &str = "ε";

/// Check if a symbol is an epsilon transition.
#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// Split a plain string into one symbol per character.
pub fn split_symbols(input: &str) -> Vec<String> {
    input.chars().map(String::from).collect()
}

/// The declared input symbols of an automaton, in declaration order.
///
/// The epsilon marker is never a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: IndexSet<String>,
}

impl Alphabet {
    pub(crate) fn insert(&mut self, name: &str) -> Result<SymbolId, MalformedAutomaton> {
        if name == EPSILON_NAME {
            return Err(MalformedAutomaton::EpsilonInAlphabet);
        }
        let (index, fresh) = self.symbols.insert_full(name.to_owned());
        if !fresh {
            return Err(MalformedAutomaton::DuplicateSymbol(name.to_owned()));
        }
        Ok(index as SymbolId)
    }

    /// Look up a declared symbol.
    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get_index_of(name).map(|i| i as SymbolId)
    }

    /// Look up an input symbol read at `position`, failing with
    /// [`AutomatonError::UnknownSymbol`] when it is not declared.
    pub fn resolve(&self, name: &str, position: usize) -> Result<SymbolId, AutomatonError> {
        self.id(name).ok_or_else(|| AutomatonError::UnknownSymbol {
            symbol: name.to_owned(),
            position,
        })
    }

    /// The name of a symbol. The epsilon marker resolves to [`EPSILON_NAME`].
    pub fn name(&self, symbol: SymbolId) -> Option<&str> {
        if is_epsilon(symbol) {
            Some(EPSILON_NAME)
        } else {
            self.symbols.get_index(symbol as usize).map(String::as_str)
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    /// All symbol ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).map(|i| i as SymbolId)
    }

    /// All symbol names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(String::as_str)
    }
}
