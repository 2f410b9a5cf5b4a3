//! State types for automata.

use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::automaton::error::MalformedAutomaton;

/// A state identifier: the index of the state in its [`StateNames`] table.
pub type StateId = u32;

/// A set of states implemented using a fixed-size bit set.
///
/// Equality and hashing only look at the members, so two sets built with
/// different capacities compare equal when they hold the same states.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state, returning `true` if it was not already present.
    pub fn insert(&mut self, state: StateId) -> bool {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        !self.bits.put(idx)
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.bits.contains(state as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over all states in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ones: self.bits.ones(),
        }
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set shares at least one state with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.iter().all(|state| other.contains(state))
    }

    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

/// Iterator over the members of a [`StateSet`].
pub struct Iter<'a> {
    ones: fixedbitset::Ones<'a>,
}

impl Iterator for Iter<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        self.ones.next().map(|i| i as StateId)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for member in self.iter() {
            member.hash(state);
        }
        self.len().hash(state);
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::default();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

/// Names of the states of one automaton, indexed by [`StateId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateNames {
    names: IndexSet<String>,
}

impl StateNames {
    pub(crate) fn insert(&mut self, name: &str) -> Result<StateId, MalformedAutomaton> {
        let (index, fresh) = self.names.insert_full(name.to_owned());
        if !fresh {
            return Err(MalformedAutomaton::DuplicateState(name.to_owned()));
        }
        Ok(index as StateId)
    }

    /// Return the id of `name`, adding it when it is new.
    pub(crate) fn intern(&mut self, name: &str) -> StateId {
        self.names.insert_full(name.to_owned()).0 as StateId
    }

    /// Look up a declared state, failing with
    /// [`MalformedAutomaton::UndeclaredState`] when it is unknown.
    pub(crate) fn require(&self, name: &str) -> Result<StateId, MalformedAutomaton> {
        self.id(name)
            .ok_or_else(|| MalformedAutomaton::UndeclaredState(name.to_owned()))
    }

    pub fn id(&self, name: &str) -> Option<StateId> {
        self.names.get_index_of(name).map(|i| i as StateId)
    }

    /// The name of a state.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this table.
    pub fn name(&self, state: StateId) -> &str {
        &self.names[state as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All state ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.names.len()).map(|i| i as StateId)
    }

    /// All state ids ordered by name.
    pub fn sorted_ids(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self.ids().collect();
        ids.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        assert!(set.insert(3));
        assert!(set.insert(7));
        assert!(!set.insert(3));
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
        assert!(!set.contains(100));
    }

    #[test]
    fn test_state_set_union() {
        let mut set1: StateSet = [1, 3].into_iter().collect();
        let set2: StateSet = [2, 3, 12].into_iter().collect();

        set1.union_with(&set2);
        assert_eq!(set1.to_vec(), vec![1, 2, 3, 12]);
    }

    #[test]
    fn test_state_set_intersects() {
        let set1: StateSet = [1, 3, 5].into_iter().collect();
        let set2: StateSet = [2, 5].into_iter().collect();
        let set3: StateSet = [0, 2].into_iter().collect();

        assert!(set1.intersects(&set2));
        assert!(!set1.intersects(&set3));
        assert!(!set1.intersects(&StateSet::default()));
    }

    #[test]
    fn test_equality_ignores_capacity() {
        let small: StateSet = [0, 2].into_iter().collect();
        let mut large = StateSet::with_capacity(64);
        large.insert(2);
        large.insert(0);

        assert_eq!(small, large);
        let mut seen = HashSet::new();
        seen.insert(small);
        assert!(seen.contains(&large));
        assert_eq!(StateSet::default(), StateSet::with_capacity(8));
    }

    #[test]
    fn test_state_set_singleton() {
        let set = StateSet::singleton(5, 10);
        assert_eq!(set.len(), 1);
        assert!(set.contains(5));
        assert!(set.is_subset(&[1, 5].into_iter().collect()));
    }

    #[test]
    fn test_state_names() {
        let mut names = StateNames::default();
        assert_eq!(names.insert("q1"), Ok(0));
        assert_eq!(names.insert("q0"), Ok(1));
        assert_eq!(
            names.insert("q1"),
            Err(MalformedAutomaton::DuplicateState("q1".into()))
        );
        assert_eq!(names.name(1), "q0");
        assert_eq!(names.sorted_ids(), vec![1, 0]);
        assert_eq!(
            names.require("q9"),
            Err(MalformedAutomaton::UndeclaredState("q9".into()))
        );
    }
}
