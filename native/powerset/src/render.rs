//! Graphviz DOT rendering of DFA snapshots.

use std::collections::HashSet;
use std::fmt;

use crate::automaton::{Automaton, Dfa, StateId, SymbolId};

const HIGHLIGHT: &str = "color=red, fontcolor=red, penwidth=2";

/// A read-only view of a DFA together with the edges and states to emphasize.
#[derive(Debug, Clone)]
pub struct DfaSnapshot<'a> {
    dfa: &'a Dfa,
    highlight_edges: HashSet<(StateId, SymbolId)>,
    highlight_states: HashSet<StateId>,
}

impl<'a> DfaSnapshot<'a> {
    pub fn new(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            highlight_edges: HashSet::new(),
            highlight_states: HashSet::new(),
        }
    }

    /// Emphasize the transitions leaving `source` on `symbol`.
    pub fn highlight_edges<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (StateId, SymbolId)>,
    {
        self.highlight_edges.extend(edges);
        self
    }

    pub fn highlight_states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = StateId>,
    {
        self.highlight_states.extend(states);
        self
    }

    /// Render as a left-to-right `digraph`, states in name order.
    pub fn to_dot(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DfaSnapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dfa = self.dfa;

        writeln!(f, "digraph dfa {{")?;
        writeln!(f, "    rankdir=LR;")?;
        writeln!(f, "    \"\" [shape=none];")?;

        let states = dfa.states().sorted_ids();
        for &state in &states {
            let shape = if dfa.is_final(state) {
                "doublecircle"
            } else {
                "circle"
            };
            write!(f, "    {} [shape={shape}", quote(dfa.state_name(state)))?;
            if self.highlight_states.contains(&state) {
                write!(f, ", {HIGHLIGHT}")?;
            }
            writeln!(f, "];")?;
        }

        writeln!(
            f,
            "    \"\" -> {};",
            quote(dfa.state_name(dfa.start_state()))
        )?;

        for &state in &states {
            for symbol in dfa.alphabet().ids() {
                let Some(target) = dfa.transition(state, symbol) else {
                    continue;
                };
                write!(
                    f,
                    "    {} -> {} [label={}",
                    quote(dfa.state_name(state)),
                    quote(dfa.state_name(target)),
                    quote(dfa.symbol_name(symbol)),
                )?;
                if self.highlight_edges.contains(&(state, symbol)) {
                    write!(f, ", {HIGHLIGHT}")?;
                }
                writeln!(f, "];")?;
            }
        }

        writeln!(f, "}}")
    }
}

/// Quote a DOT identifier.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
