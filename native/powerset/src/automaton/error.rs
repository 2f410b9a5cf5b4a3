//! Error types shared by both automaton kinds.

use thiserror::Error;

/// Failures reported by acceptance queries and automaton construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// An input symbol is not part of the declared alphabet.
    #[error("symbol '{symbol}' at position {position} is not in the alphabet")]
    UnknownSymbol { symbol: String, position: usize },

    #[error("malformed automaton: {0}")]
    Malformed(#[from] MalformedAutomaton),
}

/// Structural problems detected while building an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedAutomaton {
    #[error("no start state was set")]
    MissingStart,

    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("symbol '{0}' is declared more than once")]
    DuplicateSymbol(String),

    #[error("the epsilon marker cannot be declared as an input symbol")]
    EpsilonInAlphabet,

    #[error("state '{0}' is referenced but not declared")]
    UndeclaredState(String),

    #[error("state '{state}' has a transition on '{symbol}', which is not in the alphabet")]
    UndeclaredSymbol { state: String, symbol: String },

    #[error("state '{state}' has more than one target on '{symbol}'")]
    Nondeterministic { state: String, symbol: String },

    #[error("state '{0}' has an epsilon transition, which a DFA cannot have")]
    EpsilonInDfa(String),
}
