//! Epsilon Non-deterministic Finite Automaton (ε-NFA) implementation.

use std::collections::HashMap;

use crate::automaton::builder::Declarations;
use crate::automaton::error::{AutomatonError, MalformedAutomaton};
use crate::automaton::state::{StateId, StateNames, StateSet};
use crate::automaton::symbol::{Alphabet, EPSILON, EPSILON_NAME, SymbolId, is_epsilon};
use crate::automaton::view::Automaton;

/// An Epsilon Non-deterministic Finite Automaton.
///
/// Built through [`NfaBuilder`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: StateNames,
    alphabet: Alphabet,
    start_state: StateId,
    final_states: StateSet,
    /// Transitions: (source, symbol) -> set of destination states
    /// For epsilon transitions, symbol == EPSILON
    transitions: HashMap<(StateId, SymbolId), StateSet>,
    /// Epsilon closure of every single state, indexed by state id
    epsilon_closures: Vec<StateSet>,
    /// Returned for (state, symbol) pairs without transitions
    no_targets: StateSet,
}

impl Nfa {
    pub fn builder() -> NfaBuilder {
        NfaBuilder::default()
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<StateId> {
        self.states.id(name)
    }

    /// Build a state set sized for this automaton.
    pub fn state_set<I: IntoIterator<Item = StateId>>(&self, states: I) -> StateSet {
        let mut set = StateSet::with_capacity(self.states.len());
        for state in states {
            set.insert(state);
        }
        set
    }

    /// Compute the epsilon closure of a single state using DFS.
    fn epsilon_closure_single(
        transitions: &HashMap<(StateId, SymbolId), StateSet>,
        state: StateId,
        capacity: usize,
    ) -> StateSet {
        let mut closure = StateSet::with_capacity(capacity);
        let mut stack = vec![state];
        closure.insert(state);

        while let Some(s) = stack.pop() {
            if let Some(destinations) = transitions.get(&(s, EPSILON)) {
                for dest in destinations {
                    if closure.insert(dest) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// The smallest superset of `states` closed under epsilon transitions.
    ///
    /// An empty input yields an empty closure.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.states.len());
        for state in states {
            match self.epsilon_closures.get(state as usize) {
                Some(cached) => closure.union_with(cached),
                None => {
                    closure.insert(state);
                }
            }
        }
        closure
    }

    /// Union of the `symbol` targets of every state in `states`.
    ///
    /// No epsilon closure is applied. The epsilon marker has no targets here;
    /// epsilon moves are only followed by [`Nfa::epsilon_closure`].
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        let mut reached = StateSet::with_capacity(self.states.len());
        if is_epsilon(symbol) {
            return reached;
        }

        for state in states {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                reached.union_with(destinations);
            }
        }

        reached
    }

    /// States active before any input is read.
    pub fn initial_states(&self) -> StateSet {
        self.epsilon_closure(&StateSet::singleton(self.start_state, self.states.len()))
    }

    /// Decide whether the NFA accepts `input`, read one symbol per item.
    ///
    /// Fails on the first symbol that is not in the alphabet.
    pub fn accepts<I>(&self, input: I) -> Result<bool, AutomatonError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut active = self.initial_states();
        for (position, symbol) in input.into_iter().enumerate() {
            let symbol = self.alphabet.resolve(symbol.as_ref(), position)?;
            active = self.epsilon_closure(&self.move_on_symbol(&active, symbol));
        }
        Ok(active.intersects(&self.final_states))
    }

    /// [`Nfa::accepts`] with one symbol per character of `input`.
    pub fn accepts_str(&self, input: &str) -> Result<bool, AutomatonError> {
        self.accepts(input.chars().map(String::from))
    }

    /// Whether any state has an epsilon move.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.keys().any(|&(_, symbol)| is_epsilon(symbol))
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&(src, sym), dests)| dests.iter().map(move |dst| (src, sym, dst)))
    }
}

impl Automaton for Nfa {
    type Targets<'a> = &'a StateSet;

    const DETERMINISTIC: bool = false;

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
        self.transitions
            .get(&(state, symbol))
            .unwrap_or(&self.no_targets)
    }

    fn transition_symbols(&self) -> Vec<SymbolId> {
        let mut symbols: Vec<SymbolId> = self.alphabet.ids().collect();
        if self.has_epsilon_transitions() {
            symbols.push(EPSILON);
        }
        symbols
    }
}

/// Collects the parts of an [`Nfa`] by name and validates them in
/// [`NfaBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct NfaBuilder {
    declarations: Declarations,
    transitions: Vec<(String, String, String)>,
}

impl NfaBuilder {
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
        for name in names {
            self.add_state(name);
        }
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
        for name in names {
            self.add_symbol(name);
        }
        self
    }

    /// Add a transition. A `symbol` spelled [`EPSILON_NAME`] is an epsilon move.
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

    pub fn add_epsilon_transition(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> &mut Self {
        self.add_transition(source, EPSILON_NAME, destination)
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
        for name in names {
            self.add_final_state(name);
        }
        self
    }

    /// Validate the declarations and freeze them into an [`Nfa`].
    pub fn build(&self) -> Result<Nfa, MalformedAutomaton> {
        let interned = self.declarations.intern()?;
        interned.rows(&self.declarations)?;
        let capacity = interned.capacity();

        let mut transitions: HashMap<(StateId, SymbolId), StateSet> = HashMap::new();
        for (source, symbol, destination) in &self.transitions {
            let (src, sym, dst) = interned.edge(source, symbol, destination)?;
            transitions
                .entry((src, sym))
                .or_insert_with(|| StateSet::with_capacity(capacity))
                .insert(dst);
        }

        let epsilon_closures = (0..capacity as StateId)
            .map(|state| Nfa::epsilon_closure_single(&transitions, state, capacity))
            .collect();

        Ok(Nfa {
            states: interned.states,
            alphabet: interned.alphabet,
            start_state: interned.start_state,
            final_states: interned.final_states,
            transitions,
            epsilon_closures,
            no_targets: StateSet::with_capacity(capacity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A -ε-> B -ε-> C, C -ε-> {B, D}, C -0-> D, D -1-> D; D final.
    fn epsilon_chain() -> Nfa {
        Nfa::builder()
            .add_states(["A", "B", "C", "D"])
            .add_symbols(["0", "1"])
            .add_epsilon_transition("A", "B")
            .add_epsilon_transition("B", "C")
            .add_epsilon_transition("C", "B")
            .add_epsilon_transition("C", "D")
            .add_transition("C", "0", "D")
            .add_transition("D", "1", "D")
            .set_start_state("A")
            .add_final_state("D")
            .build()
            .unwrap()
    }

    fn named(nfa: &Nfa, names: &[&str]) -> StateSet {
        nfa.state_set(names.iter().map(|n| nfa.state(n).unwrap()))
    }

    #[test]
    fn test_epsilon_closure() {
        let nfa = epsilon_chain();

        let closure = nfa.epsilon_closure(&named(&nfa, &["A"]));
        assert_eq!(closure, named(&nfa, &["A", "B", "C", "D"]));

        let closure = nfa.epsilon_closure(&named(&nfa, &["B"]));
        assert_eq!(closure, named(&nfa, &["B", "C", "D"]));

        let closure = nfa.epsilon_closure(&named(&nfa, &["D"]));
        assert_eq!(closure, named(&nfa, &["D"]));
    }

    #[test]
    fn test_epsilon_closure_of_empty_set() {
        let nfa = epsilon_chain();
        assert!(nfa.epsilon_closure(&StateSet::default()).is_empty());
    }

    #[test]
    fn test_epsilon_closure_is_idempotent_and_monotone() {
        let nfa = epsilon_chain();
        for names in [&["A"][..], &["B", "D"], &["C"], &["D"], &[]] {
            let set = named(&nfa, names);
            let once = nfa.epsilon_closure(&set);
            assert!(set.is_subset(&once));
            assert_eq!(nfa.epsilon_closure(&once), once);
        }
    }

    #[test]
    fn test_move_on_symbol() {
        // 0 -a-> 1, 0 -a-> 2, 1 -ε-> 3
        let nfa = Nfa::builder()
            .add_states(["0", "1", "2", "3"])
            .add_symbol("a")
            .add_transition("0", "a", "1")
            .add_transition("0", "a", "2")
            .add_epsilon_transition("1", "3")
            .set_start_state("0")
            .build()
            .unwrap();

        let a = nfa.alphabet().id("a").unwrap();
        let reached = nfa.move_on_symbol(&named(&nfa, &["0"]), a);
        assert_eq!(reached, named(&nfa, &["1", "2"]));

        let closed = nfa.epsilon_closure(&reached);
        assert_eq!(closed, named(&nfa, &["1", "2", "3"]));

        assert!(nfa.move_on_symbol(&named(&nfa, &["3"]), a).is_empty());
        assert!(nfa.move_on_symbol(&named(&nfa, &["0"]), EPSILON).is_empty());
    }

    #[test]
    fn test_accepts_epsilon_chain() {
        let nfa = epsilon_chain();
        // D is in the closure of A, so the empty string is accepted.
        assert_eq!(nfa.accepts_str(""), Ok(true));
        assert_eq!(nfa.accepts_str("0"), Ok(true));
        assert_eq!(nfa.accepts_str("1"), Ok(true));
        assert_eq!(nfa.accepts_str("0111"), Ok(true));
        assert_eq!(nfa.accepts_str("00"), Ok(false));
        assert_eq!(nfa.accepts_str("101"), Ok(false));
    }

    #[test]
    fn test_accepts_sequence_of_multichar_symbols() {
        let nfa = Nfa::builder()
            .add_states(["s", "t"])
            .add_symbols(["go", "stop"])
            .add_transition("s", "go", "t")
            .add_transition("t", "stop", "s")
            .set_start_state("s")
            .add_final_state("s")
            .build()
            .unwrap();

        assert_eq!(nfa.accepts(["go", "stop"]), Ok(true));
        assert_eq!(nfa.accepts(["go"]), Ok(false));
        assert_eq!(nfa.accepts(Vec::<String>::new()), Ok(true));
    }

    #[test]
    fn test_unknown_symbol_is_reported_even_after_dead_end() {
        let nfa = epsilon_chain();
        assert_eq!(
            nfa.accepts_str("00x"),
            Err(AutomatonError::UnknownSymbol {
                symbol: "x".into(),
                position: 2
            })
        );
    }

    #[test]
    fn test_build_rejects_phantom_states() {
        let err = Nfa::builder()
            .add_states(["A"])
            .add_symbol("a")
            .add_transition("A", "a", "Ghost")
            .set_start_state("A")
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedAutomaton::UndeclaredState("Ghost".into()));

        let err = Nfa::builder()
            .add_states(["A"])
            .set_start_state("B")
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedAutomaton::UndeclaredState("B".into()));

        let err = Nfa::builder()
            .add_states(["A"])
            .set_start_state("A")
            .add_final_state("Z")
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedAutomaton::UndeclaredState("Z".into()));
    }

    #[test]
    fn test_build_rejects_bad_alphabet() {
        let err = Nfa::builder()
            .add_states(["A"])
            .add_symbol(EPSILON_NAME)
            .set_start_state("A")
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedAutomaton::EpsilonInAlphabet);

        let err = Nfa::builder()
            .add_states(["A"])
            .add_symbol("a")
            .add_transition("A", "b", "A")
            .set_start_state("A")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            MalformedAutomaton::UndeclaredSymbol {
                state: "A".into(),
                symbol: "b".into()
            }
        );
    }

    #[test]
    fn test_build_requires_start() {
        let err = Nfa::builder().add_state("A").build().unwrap_err();
        assert_eq!(err, MalformedAutomaton::MissingStart);
    }

    #[test]
    fn test_transition_symbols_include_epsilon_only_when_used() {
        let nfa = epsilon_chain();
        assert_eq!(nfa.transition_symbols(), vec![0, 1, EPSILON]);

        let plain = Nfa::builder()
            .add_state("A")
            .add_symbol("a")
            .add_transition("A", "a", "A")
            .set_start_state("A")
            .build()
            .unwrap();
        assert_eq!(plain.transition_symbols(), vec![0]);
        assert_eq!(plain.transitions().collect::<Vec<_>>(), vec![(0, 0, 0)]);
    }

    #[test]
    fn test_empty_rows_are_validated() {
        let err = Nfa::builder()
            .add_state("A")
            .add_symbol("a")
            .add_row("ghost", Vec::<String>::new())
            .set_start_state("A")
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedAutomaton::UndeclaredState("ghost".into()));

        let err = Nfa::builder()
            .add_state("A")
            .add_symbol("a")
            .add_row("A", ["zz"])
            .set_start_state("A")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            MalformedAutomaton::UndeclaredSymbol {
                state: "A".into(),
                symbol: "zz".into()
            }
        );

        assert!(
            Nfa::builder()
                .add_state("A")
                .add_symbol("a")
                .add_row("A", ["a", EPSILON_NAME])
                .set_start_state("A")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Nfa>();
        assert_send_sync::<StateSet>();
    }
}
