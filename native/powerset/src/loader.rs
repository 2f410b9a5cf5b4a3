//! JSON documents describing automata.
//!
//! ```json
//! {
//!   "kind": "nfa",
//!   "states": ["A", "B"],
//!   "alphabet": ["0"],
//!   "transition": { "A": { "ε": ["B"], "0": ["A", "B"] } },
//!   "start_state": "A",
//!   "final_states": ["B"]
//! }
//! ```
//!
//! A DFA document maps each symbol to a single target name instead of a list.
//! The `kind` field may be left out when the caller names the kind instead.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::automaton::{Automaton, Dfa, DfaBuilder, MalformedAutomaton, Nfa, NfaBuilder};

/// Which automaton a document encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AutomatonKind {
    Nfa,
    Dfa,
}

impl fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonKind::Nfa => f.write_str("nfa"),
            AutomatonKind::Dfa => f.write_str("dfa"),
        }
    }
}

/// Targets of one `(state, symbol)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    One(String),
    Many(Vec<String>),
}

/// On-disk form of an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AutomatonKind>,
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    #[serde(default)]
    pub transition: IndexMap<String, IndexMap<String, Targets>>,
    pub start_state: String,
    #[serde(default)]
    pub final_states: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid automaton document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the document does not declare its kind and none was requested")]
    KindMissing,

    #[error("the document declares a {declared} but a {requested} was requested")]
    KindConflict {
        declared: AutomatonKind,
        requested: AutomatonKind,
    },

    #[error("state '{state}' on '{symbol}': a DFA transition takes a single target")]
    ExpectedSingleTarget { state: String, symbol: String },

    #[error("state '{state}' on '{symbol}': an NFA transition takes a list of targets")]
    ExpectedTargetList { state: String, symbol: String },

    #[error(transparent)]
    Malformed(#[from] MalformedAutomaton),
}

/// A validated automaton of either kind.
#[derive(Debug, Clone)]
pub enum LoadedAutomaton {
    Nfa(Nfa),
    Dfa(Dfa),
}

impl LoadedAutomaton {
    pub fn kind(&self) -> AutomatonKind {
        match self {
            LoadedAutomaton::Nfa(_) => AutomatonKind::Nfa,
            LoadedAutomaton::Dfa(_) => AutomatonKind::Dfa,
        }
    }
}

impl AutomatonDocument {
    /// Settle the kind from the document and the caller's request.
    pub fn resolve_kind(
        &self,
        requested: Option<AutomatonKind>,
    ) -> Result<AutomatonKind, LoadError> {
        match (self.kind, requested) {
            (Some(declared), Some(requested)) if declared != requested => {
                Err(LoadError::KindConflict {
                    declared,
                    requested,
                })
            }
            (Some(kind), _) | (None, Some(kind)) => Ok(kind),
            (None, None) => Err(LoadError::KindMissing),
        }
    }

    pub fn to_nfa(&self) -> Result<Nfa, LoadError> {
        let mut builder = NfaBuilder::new();
        builder
            .add_states(&self.states)
            .add_symbols(&self.alphabet)
            .set_start_state(&self.start_state)
            .add_final_states(&self.final_states);

        for (state, row) in &self.transition {
            builder.add_row(state, row.keys());
            for (symbol, targets) in row {
                let Targets::Many(targets) = targets else {
                    return Err(LoadError::ExpectedTargetList {
                        state: state.clone(),
                        symbol: symbol.clone(),
                    });
                };
                for target in targets {
                    builder.add_transition(state, symbol, target);
                }
            }
        }

        Ok(builder.build()?)
    }

    pub fn to_dfa(&self) -> Result<Dfa, LoadError> {
        let mut builder = DfaBuilder::new();
        builder
            .add_states(&self.states)
            .add_symbols(&self.alphabet)
            .set_start_state(&self.start_state)
            .add_final_states(&self.final_states);

        for (state, row) in &self.transition {
            builder.add_row(state, row.keys());
            for (symbol, targets) in row {
                let Targets::One(target) = targets else {
                    return Err(LoadError::ExpectedSingleTarget {
                        state: state.clone(),
                        symbol: symbol.clone(),
                    });
                };
                builder.add_transition(state, symbol, target);
            }
        }

        Ok(builder.build()?)
    }

    /// Build the automaton of the resolved kind.
    pub fn into_automaton(
        self,
        requested: Option<AutomatonKind>,
    ) -> Result<LoadedAutomaton, LoadError> {
        match self.resolve_kind(requested)? {
            AutomatonKind::Nfa => self.to_nfa().map(LoadedAutomaton::Nfa),
            AutomatonKind::Dfa => self.to_dfa().map(LoadedAutomaton::Dfa),
        }
    }

    /// Describe an automaton in document form, states and symbols in
    /// declaration order.
    pub fn from_automaton<A: Automaton>(automaton: &A) -> Self {
        let states = automaton.states();
        let mut transition = IndexMap::new();
        for state in states.ids() {
            let mut row = IndexMap::new();
            for symbol in automaton.transition_symbols() {
                let targets: Vec<String> = automaton
                    .targets(state, symbol)
                    .into_iter()
                    .map(|target| states.name(target).to_owned())
                    .collect();
                if targets.is_empty() {
                    continue;
                }
                let targets = match (A::DETERMINISTIC, targets.as_slice()) {
                    (true, [single]) => Targets::One(single.clone()),
                    _ => Targets::Many(targets),
                };
                row.insert(automaton.symbol_name(symbol).to_owned(), targets);
            }
            if !row.is_empty() {
                transition.insert(states.name(state).to_owned(), row);
            }
        }

        Self {
            kind: Some(if A::DETERMINISTIC {
                AutomatonKind::Dfa
            } else {
                AutomatonKind::Nfa
            }),
            states: states.ids().map(|s| states.name(s).to_owned()).collect(),
            alphabet: automaton.alphabet().names().map(str::to_owned).collect(),
            transition,
            start_state: states.name(automaton.start_state()).to_owned(),
            final_states: automaton
                .final_states()
                .iter()
                .map(|s| states.name(s).to_owned())
                .collect(),
        }
    }
}

/// Parse and validate a JSON document.
pub fn load_str(
    json: &str,
    requested: Option<AutomatonKind>,
) -> Result<LoadedAutomaton, LoadError> {
    let document: AutomatonDocument = serde_json::from_str(json)?;
    let automaton = document.into_automaton(requested)?;
    debug!(
        kind = %automaton.kind(),
        states = match &automaton {
            LoadedAutomaton::Nfa(nfa) => nfa.states().len(),
            LoadedAutomaton::Dfa(dfa) => dfa.states().len(),
        },
        "loaded automaton"
    );
    Ok(automaton)
}

/// Read, parse and validate a JSON document from disk.
pub fn load_path(
    path: impl AsRef<Path>,
    requested: Option<AutomatonKind>,
) -> Result<LoadedAutomaton, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), "reading automaton document");
    load_str(&json, requested)
}

/// Serialize an automaton as a pretty-printed JSON document.
pub fn to_json<A: Automaton>(automaton: &A) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(
        &AutomatonDocument::from_automaton(automaton),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON_CHAIN: &str = r#"{
        "states": ["A", "B", "C", "D"],
        "alphabet": ["0", "1"],
        "transition": {
            "A": { "ε": ["B"] },
            "B": { "ε": ["C"] },
            "C": { "ε": ["B", "D"], "0": ["D"] },
            "D": { "1": ["D"] }
        },
        "start_state": "A",
        "final_states": ["D"]
    }"#;

    const ENDS_IN_ONE: &str = r#"{
        "kind": "dfa",
        "states": ["q0", "q1"],
        "alphabet": ["0", "1"],
        "transition": {
            "q0": { "0": "q0", "1": "q1" },
            "q1": { "0": "q0", "1": "q1" }
        },
        "start_state": "q0",
        "final_states": ["q1"]
    }"#;

    #[test]
    fn test_load_nfa_with_requested_kind() {
        let LoadedAutomaton::Nfa(nfa) = load_str(EPSILON_CHAIN, Some(AutomatonKind::Nfa)).unwrap()
        else {
            panic!("expected an NFA");
        };
        assert_eq!(nfa.states().len(), 4);
        assert!(nfa.has_epsilon_transitions());
        assert_eq!(nfa.accepts_str("0"), Ok(true));
    }

    #[test]
    fn test_load_dfa_with_declared_kind() {
        let loaded = load_str(ENDS_IN_ONE, None).unwrap();
        assert_eq!(loaded.kind(), AutomatonKind::Dfa);
        let LoadedAutomaton::Dfa(dfa) = loaded else {
            panic!("expected a DFA");
        };
        assert_eq!(dfa.accepts_str("0101"), Ok(true));
        assert_eq!(dfa.accepts_str("10"), Ok(false));
    }

    #[test]
    fn test_kind_must_be_known() {
        assert!(matches!(
            load_str(EPSILON_CHAIN, None),
            Err(LoadError::KindMissing)
        ));
        assert!(matches!(
            load_str(ENDS_IN_ONE, Some(AutomatonKind::Nfa)),
            Err(LoadError::KindConflict {
                declared: AutomatonKind::Dfa,
                requested: AutomatonKind::Nfa
            })
        ));
        assert!(load_str(ENDS_IN_ONE, Some(AutomatonKind::Dfa)).is_ok());
    }

    #[test]
    fn test_target_shape_must_match_kind() {
        let err = load_str(EPSILON_CHAIN, Some(AutomatonKind::Dfa)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ExpectedSingleTarget { ref state, ref symbol } if state == "A" && symbol == "ε"
        ));

        let as_nfa = ENDS_IN_ONE.replace(r#""kind": "dfa","#, r#""kind": "nfa","#);
        let err = load_str(&as_nfa, None).unwrap_err();
        assert!(matches!(err, LoadError::ExpectedTargetList { .. }));
    }

    #[test]
    fn test_epsilon_key_rejected_in_dfa() {
        let json = r#"{
            "kind": "dfa",
            "states": ["p", "q"],
            "alphabet": [],
            "transition": { "p": { "ε": "q" } },
            "start_state": "p"
        }"#;
        assert!(matches!(
            load_str(json, None),
            Err(LoadError::Malformed(MalformedAutomaton::EpsilonInDfa(_)))
        ));
    }

    #[test]
    fn test_phantom_state_rejected() {
        let json = r#"{
            "kind": "nfa",
            "states": ["p"],
            "alphabet": ["a"],
            "transition": { "p": { "a": ["ghost"] } },
            "start_state": "p",
            "final_states": []
        }"#;
        assert!(matches!(
            load_str(json, None),
            Err(LoadError::Malformed(MalformedAutomaton::UndeclaredState(ref s))) if s == "ghost"
        ));
    }

    #[test]
    fn test_rows_without_targets_are_validated() {
        let ghost_row = r#"{
            "kind": "nfa",
            "states": ["p"],
            "alphabet": ["a"],
            "transition": { "p": { "a": ["p"] }, "ghost": {} },
            "start_state": "p"
        }"#;
        assert!(matches!(
            load_str(ghost_row, None),
            Err(LoadError::Malformed(MalformedAutomaton::UndeclaredState(ref s))) if s == "ghost"
        ));

        let unknown_symbol = r#"{
            "kind": "nfa",
            "states": ["p"],
            "alphabet": ["a"],
            "transition": { "p": { "a": ["p"], "zz": [] } },
            "start_state": "p"
        }"#;
        assert!(matches!(
            load_str(unknown_symbol, None),
            Err(LoadError::Malformed(MalformedAutomaton::UndeclaredSymbol { ref symbol, .. }))
                if symbol == "zz"
        ));

        let dfa_ghost_row = r#"{
            "kind": "dfa",
            "states": ["q0"],
            "alphabet": ["0"],
            "transition": { "q0": { "0": "q0" }, "ghost": {} },
            "start_state": "q0"
        }"#;
        assert!(matches!(
            load_str(dfa_ghost_row, None),
            Err(LoadError::Malformed(MalformedAutomaton::UndeclaredState(ref s))) if s == "ghost"
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            load_str("{ not json", Some(AutomatonKind::Nfa)),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_path("/definitely/not/here.json", None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_converted_dfa_document() {
        let LoadedAutomaton::Nfa(nfa) = load_str(EPSILON_CHAIN, Some(AutomatonKind::Nfa)).unwrap()
        else {
            panic!("expected an NFA");
        };
        let dfa = nfa.to_dfa();
        let document = AutomatonDocument::from_automaton(&dfa);

        assert_eq!(document.kind, Some(AutomatonKind::Dfa));
        assert_eq!(document.start_state, "S0");
        assert_eq!(document.alphabet, vec!["0", "1"]);
        for row in document.transition.values() {
            assert!(row.values().all(|t| matches!(t, Targets::One(_))));
            assert_eq!(row.len(), 2);
        }

        let json = to_json(&dfa).unwrap();
        let LoadedAutomaton::Dfa(reloaded) = load_str(&json, None).unwrap() else {
            panic!("expected a DFA");
        };
        for input in ["", "0", "1", "01", "011", "10", "00"] {
            assert_eq!(reloaded.accepts_str(input), dfa.accepts_str(input), "{input}");
        }
    }

    #[test]
    fn test_nfa_document_keeps_epsilon_rows() {
        let LoadedAutomaton::Nfa(nfa) = load_str(EPSILON_CHAIN, Some(AutomatonKind::Nfa)).unwrap()
        else {
            panic!("expected an NFA");
        };
        let document = AutomatonDocument::from_automaton(&nfa);
        assert_eq!(document.kind, Some(AutomatonKind::Nfa));
        assert_eq!(
            document.transition["C"]["ε"],
            Targets::Many(vec!["B".into(), "D".into()])
        );
        assert_eq!(document.transition["C"]["0"], Targets::Many(vec!["D".into()]));
        assert!(!document.transition.contains_key("X"));
    }
}
