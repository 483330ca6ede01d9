//! Shared types for the gold automata engine.
//!
//! - [`state`] -- State values (atomic or tuple) and state sets
//! - [`symbol`] -- Input symbols, the epsilon marker, alphabets
//! - [`error`] -- Stack, handler, dispatch and automaton errors
//! - [`sets`] -- Helpers for declaring state sets

pub mod error;
pub mod sets;
pub mod state;
pub mod symbol;

pub use error::{AutomataError, DispatchError, StackError, StepError};
pub use state::{StackSymbol, State, StateSet, state_set};
pub use symbol::{Alphabet, Input, LAMBDA};
