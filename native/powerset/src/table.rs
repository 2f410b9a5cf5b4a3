//! Plain-text transition tables.

use std::fmt;

use crate::automaton::{Automaton, StateId, SymbolId};

/// Renders the transition function of an automaton as a fixed-width table,
/// states and symbols sorted by name, followed by the start and final states.
///
/// ```text
/// State   0       1
/// ------------------------
/// DEAD    DEAD    DEAD
/// S0      S1      S1
/// ```
pub struct TransitionTable<'a, A> {
    automaton: &'a A,
}

impl<'a, A: Automaton> TransitionTable<'a, A> {
    pub fn new(automaton: &'a A) -> Self {
        Self { automaton }
    }

    fn cell(&self, state: StateId, symbol: SymbolId) -> String {
        let names: Vec<&str> = self
            .automaton
            .targets(state, symbol)
            .into_iter()
            .map(|target| self.automaton.state_name(target))
            .collect();
        match names.as_slice() {
            [] => "-".to_owned(),
            [single] if A::DETERMINISTIC => (*single).to_owned(),
            _ => format!("{{{}}}", names.join(", ")),
        }
    }

    fn sorted_symbols(&self) -> Vec<SymbolId> {
        let mut symbols = self.automaton.transition_symbols();
        symbols.sort_by(|a, b| {
            self.automaton
                .symbol_name(*a)
                .cmp(self.automaton.symbol_name(*b))
        });
        symbols
    }
}

impl<A: Automaton> fmt::Display for TransitionTable<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let automaton = self.automaton;
        let states = automaton.states().sorted_ids();
        let symbols = self.sorted_symbols();
        let rows: Vec<(StateId, Vec<String>)> = states
            .iter()
            .map(|&state| {
                let cells = symbols.iter().map(|&s| self.cell(state, s)).collect();
                (state, cells)
            })
            .collect();

        let longest_state = states
            .iter()
            .map(|&s| automaton.state_name(s).chars().count())
            .max()
            .unwrap_or(0);
        let longest_symbol = symbols
            .iter()
            .map(|&s| automaton.symbol_name(s).chars().count())
            .max()
            .unwrap_or(0);
        let longest_cell = rows
            .iter()
            .flat_map(|(_, cells)| cells.iter().map(|c| c.chars().count()))
            .max()
            .unwrap_or(0);
        let width = longest_state.max(6).max(longest_symbol.max(3)).max(longest_cell) + 2;

        write!(f, "{:<width$}", "State")?;
        for &symbol in &symbols {
            write!(f, "{:<width$}", automaton.symbol_name(symbol))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(width * (symbols.len() + 1)))?;

        for (state, cells) in &rows {
            write!(f, "{:<width$}", automaton.state_name(*state))?;
            for cell in cells {
                write!(f, "{cell:<width$}")?;
            }
            writeln!(f)?;
        }

        let mut finals: Vec<&str> = automaton
            .final_states()
            .iter()
            .map(|s| automaton.state_name(s))
            .collect();
        finals.sort_unstable();
        writeln!(f)?;
        writeln!(
            f,
            "Start State : {}",
            automaton.state_name(automaton.start_state())
        )?;
        write!(f, "Final States: {{{}}}", finals.join(", "))
    }
}
