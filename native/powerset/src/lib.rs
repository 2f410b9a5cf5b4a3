//! Epsilon-NFA simulation and NFA-to-DFA conversion by subset construction.
//!
//! ```
//! use powerset::automaton::Nfa;
//!
//! let nfa = Nfa::builder()
//!     .add_states(["q0", "q1"])
//!     .add_symbols(["a", "b"])
//!     .add_transition("q0", "a", "q1")
//!     .add_transition("q1", "a", "q1")
//!     .set_start_state("q0")
//!     .add_final_state("q1")
//!     .build()?;
//!
//! let dfa = nfa.to_dfa();
//! assert!(dfa.accepts_str("aaa")?);
//! assert!(!dfa.accepts_str("ab")?);
//! assert!(dfa.dead_state().is_some());
//! # Ok::<(), powerset::automaton::AutomatonError>(())
//! ```

pub mod automaton;
pub mod loader;
pub mod render;
pub mod table;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn powerset(m: &Bound<'_, PyModule>) -> PyResult<()> {
    automaton::automaton(m)
}
