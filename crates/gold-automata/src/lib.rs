//! Finite and pushdown automata built from arity-dispatched transition
//! handlers.
//!
//! A transition relation is a [`Dispatcher`]: handlers registered under the
//! number of parameters they take, so tuple states can be handled by
//! multi-parameter closures while scalar states use single-parameter ones.
//! Deterministic automata validate the whole `states x alphabet` product at
//! construction; nondeterministic and pushdown automata answer queries by
//! exploring every branch, epsilon moves included.
//!
//! # Architecture
//!
//! - [`dispatch`] -- Arity-keyed transition relations (plain and pushdown)
//! - [`stack`] -- Branch-local LIFO stack with expect-exact pop
//! - [`definition`] -- States, alphabet, initial and final states
//! - [`graph`] -- Transition product validation and the exported graph
//! - [`deterministic`] -- DFA and Mealy transducer
//! - [`nondeterministic`] -- NFA with epsilon moves
//! - [`pushdown`] -- Pushdown automaton
//! - [`search`] -- Branch exploration shared by NFA and PDA queries
//! - [`config`] -- Search tuning (workers, deduplication)
//! - [`path`] -- Witness paths

pub mod config;
pub mod definition;
pub mod deterministic;
pub mod dispatch;
pub mod graph;
pub mod nondeterministic;
pub mod path;
pub mod pushdown;
pub mod search;
pub mod stack;

use gold_core::AutomataError;

pub use config::SearchConfig;
pub use definition::Definition;
pub use deterministic::{DeterministicAutomaton, DeterministicTransducer};
pub use dispatch::{Dispatcher, PushdownDispatcher, Step, to};
pub use graph::{Edge, StateGraph};
pub use nondeterministic::NondeterministicAutomaton;
pub use path::{Path, PathStep};
pub use pushdown::PushdownAutomaton;
pub use stack::AutomatonStack;

/// Acceptance queries, common to every automaton kind.
///
/// Queries take `&self` and keep no state between calls: asking twice gives
/// the same verdict. When several runs accept, which one
/// [`accepts_with_path`](Self::accepts_with_path) returns is unspecified.
pub trait Acceptor {
    fn definition(&self) -> &Definition;

    /// The validated transition graph.
    fn graph(&self) -> &StateGraph;

    /// Whether some run over `tape` ends in an accepting configuration.
    ///
    /// Fails with [`AutomataError::SymbolNotInAlphabet`] before any
    /// transition is taken if `tape` contains a foreign symbol.
    fn accepts(&self, tape: &str) -> Result<bool, AutomataError> {
        self.accepts_with_path(tape).map(|(accepted, _)| accepted)
    }

    /// Like [`accepts`](Self::accepts), also returning an accepting run.
    /// The path is empty when rejected or when `tape` is empty.
    fn accepts_with_path(&self, tape: &str) -> Result<(bool, Path), AutomataError>;
}
