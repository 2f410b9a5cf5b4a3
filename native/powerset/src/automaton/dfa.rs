//! Deterministic Finite Automaton (DFA) implementation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::automaton::builder::Declarations;
use crate::automaton::error::{AutomatonError, MalformedAutomaton};
use crate::automaton::state::{StateId, StateNames, StateSet};
use crate::automaton::symbol::{Alphabet, SymbolId, is_epsilon};
use crate::automaton::view::Automaton;

/// A Deterministic Finite Automaton.
///
/// Built either through [`DfaBuilder`] or by
/// [`subset_construction`](crate::automaton::subset_construction).
#[derive(Debug, Clone)]
pub struct Dfa {
    states: StateNames,
    alphabet: Alphabet,
    start_state: StateId,
    final_states: StateSet,
    /// Transitions: (source, symbol) -> destination
    transitions: HashMap<(StateId, SymbolId), StateId>,
    /// Synthetic sink added by subset construction
    dead_state: Option<StateId>,
    /// DFA state -> the NFA states it stands for (if created via subset construction)
    state_mapping: Option<HashMap<StateId, Vec<StateId>>>,
}

impl Dfa {
    pub fn builder() -> DfaBuilder {
        DfaBuilder::default()
    }

    /// Assemble a DFA whose parts are already interned and consistent.
    pub(crate) fn from_parts(
        states: StateNames,
        alphabet: Alphabet,
        start_state: StateId,
        final_states: StateSet,
        transitions: HashMap<(StateId, SymbolId), StateId>,
        dead_state: Option<StateId>,
        state_mapping: Option<HashMap<StateId, Vec<StateId>>>,
    ) -> Self {
        Self {
            states,
            alphabet,
            start_state,
            final_states,
            transitions,
            dead_state,
            state_mapping,
        }
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<StateId> {
        self.states.id(name)
    }

    /// Get the transition from a state on a symbol. `None` means "no move".
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    /// Decide whether the DFA accepts `input`, read one symbol per item.
    ///
    /// A missing transition rejects immediately, so symbols after it are not
    /// checked against the alphabet.
    pub fn accepts<I>(&self, input: I) -> Result<bool, AutomatonError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut current = self.start_state;
        for (position, symbol) in input.into_iter().enumerate() {
            let symbol = self.alphabet.resolve(symbol.as_ref(), position)?;
            match self.transition(current, symbol) {
                Some(next) => current = next,
                None => return Ok(false),
            }
        }
        Ok(self.final_states.contains(current))
    }

    /// [`Dfa::accepts`] with one symbol per character of `input`.
    pub fn accepts_str(&self, input: &str) -> Result<bool, AutomatonError> {
        self.accepts(input.chars().map(String::from))
    }

    /// The synthetic dead state, if subset construction had to add one.
    pub fn dead_state(&self) -> Option<StateId> {
        self.dead_state
    }

    /// Whether every state has a transition on every symbol.
    pub fn is_total(&self) -> bool {
        self.states.ids().all(|state| {
            self.alphabet
                .ids()
                .all(|symbol| self.transitions.contains_key(&(state, symbol)))
        })
    }

    /// NFA states behind a DFA state produced by subset construction.
    /// `None` for the dead state and for DFAs built directly.
    pub fn subset_of(&self, state: StateId) -> Option<&[StateId]> {
        self.state_mapping
            .as_ref()
            .and_then(|mapping| mapping.get(&state))
            .map(Vec::as_slice)
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (src, sym, dst))
    }
}

impl Automaton for Dfa {
    type Targets<'a> = Option<StateId>;

    const DETERMINISTIC: bool = true;

    fn states(&self) -> &StateNames {
        &self.states
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn start_state(&self) -> StateId {
        self.start_state
    }

    fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    fn targets(&self, state: StateId, symbol: SymbolId) -> Self::Targets<'_> {
        self.transition(state, symbol)
    }
}

/// Collects the parts of a [`Dfa`] by name and validates them in
/// [`DfaBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct DfaBuilder {
    declarations: Declarations,
    transitions: Vec<(String, String, String)>,
}

impl DfaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, name: impl Into<String>) -> &mut Self {
        self.declarations.states.push(name.into());
        self
    }

    pub fn add_states<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations
            .states
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn add_symbol(&mut self, name: impl Into<String>) -> &mut Self {
        self.declarations.alphabet.push(name.into());
        self
    }

    pub fn add_symbols<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations
            .alphabet
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn add_transition(
        &mut self,
        source: impl Into<String>,
        symbol: impl Into<String>,
        destination: impl Into<String>,
    ) -> &mut Self {
        self.transitions
            .push((source.into(), symbol.into(), destination.into()));
        self
    }

    /// Declare that `state` has a transition row with the given symbol keys,
    /// so both are validated by `build()` even when no target follows.
    pub fn add_row<I, S>(&mut self, state: impl Into<String>, symbols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations
            .rows
            .push((state.into(), symbols.into_iter().map(Into::into).collect()));
        self
    }

    pub fn set_start_state(&mut self, name: impl Into<String>) -> &mut Self {
        self.declarations.start_state = Some(name.into());
        self
    }

    pub fn add_final_state(&mut self, name: impl Into<String>) -> &mut Self {
        self.declarations.final_states.push(name.into());
        self
    }

    pub fn add_final_states<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations
            .final_states
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Validate the declarations and freeze them into a [`Dfa`].
    ///
    /// Repeating an identical transition is allowed; two different targets
    /// for one `(state, symbol)` pair are not.
    pub fn build(&self) -> Result<Dfa, MalformedAutomaton> {
        let interned = self.declarations.intern()?;
        for (state, symbol) in interned.rows(&self.declarations)? {
            if is_epsilon(symbol) {
                return Err(MalformedAutomaton::EpsilonInDfa(state.to_owned()));
            }
        }

        let mut transitions = HashMap::new();
        for (source, symbol, destination) in &self.transitions {
            let (src, sym, dst) = interned.edge(source, symbol, destination)?;
            if is_epsilon(sym) {
                return Err(MalformedAutomaton::EpsilonInDfa(source.clone()));
            }
            match transitions.entry((src, sym)) {
                Entry::Vacant(entry) => {
                    entry.insert(dst);
                }
                Entry::Occupied(entry) if *entry.get() == dst => {}
                Entry::Occupied(_) => {
                    return Err(MalformedAutomaton::Nondeterministic {
                        state: source.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }

        Ok(Dfa::from_parts(
            interned.states,
            interned.alphabet,
            interned.start_state,
            interned.final_states,
            transitions,
            None,
            None,
        ))
    }
}
