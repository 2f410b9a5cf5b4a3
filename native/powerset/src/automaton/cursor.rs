//! Step-wise execution of a DFA over a fixed input.

use std::collections::VecDeque;

use crate::automaton::dfa::Dfa;
use crate::automaton::error::AutomatonError;
use crate::automaton::state::StateId;
use crate::automaton::symbol::SymbolId;
use crate::automaton::view::Automaton;

/// What one call to [`ExecutionCursor::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Consumed `symbol` and followed the transition `from -> to`.
    Moved {
        from: StateId,
        symbol: SymbolId,
        to: StateId,
    },
    /// Consumed `symbol` but `from` has no transition on it. The run rejects.
    Stuck { from: StateId, symbol: SymbolId },
    /// Nothing left to read.
    Finished { accepted: bool },
}

/// Caller-owned position of a run: the input still to read, the state
/// reached so far and how many symbols were consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionCursor {
    remaining: VecDeque<String>,
    current: StateId,
    steps: usize,
    stuck: bool,
}

impl ExecutionCursor {
    /// Place a cursor on the start state of `dfa`.
    pub fn new<I>(dfa: &Dfa, input: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            remaining: input.into_iter().map(Into::into).collect(),
            current: dfa.start_state(),
            steps: 0,
            stuck: false,
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Number of symbols consumed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn remaining(&self) -> impl Iterator<Item = &str> + '_ {
        self.remaining.iter().map(String::as_str)
    }

    /// Whether the run can make no further progress.
    pub fn is_done(&self) -> bool {
        self.stuck || self.remaining.is_empty()
    }

    /// Whether the run accepts if it ends here.
    pub fn is_accepting(&self, dfa: &Dfa) -> bool {
        !self.stuck && dfa.is_final(self.current)
    }

    /// Read one symbol.
    ///
    /// An unknown symbol leaves the cursor untouched and reports its
    /// position. Once stuck or out of input, every further call returns
    /// [`Step::Finished`].
    pub fn step(&mut self, dfa: &Dfa) -> Result<Step, AutomatonError> {
        if self.stuck {
            return Ok(Step::Finished { accepted: false });
        }
        let Some(next) = self.remaining.front() else {
            return Ok(Step::Finished {
                accepted: self.is_accepting(dfa),
            });
        };
        let symbol = dfa.alphabet().resolve(next, self.steps)?;
        self.remaining.pop_front();
        self.steps += 1;

        let from = self.current;
        match dfa.transition(from, symbol) {
            Some(to) => {
                self.current = to;
                Ok(Step::Moved { from, symbol, to })
            }
            None => {
                self.stuck = true;
                Ok(Step::Stuck { from, symbol })
            }
        }
    }

    /// Step until the run is decided; agrees with [`Dfa::accepts`].
    pub fn run_to_end(&mut self, dfa: &Dfa) -> Result<bool, AutomatonError> {
        loop {
            match self.step(dfa)? {
                Step::Moved { .. } => {}
                Step::Stuck { .. } => return Ok(false),
                Step::Finished { accepted } => return Ok(accepted),
            }
        }
    }
}
