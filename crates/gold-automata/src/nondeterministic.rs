// Nondeterministic automata with epsilon moves

use gold_core::{Alphabet, AutomataError, State};
use tracing::debug;

use crate::Acceptor;
use crate::config::SearchConfig;
use crate::definition::Definition;
use crate::dispatch::Dispatcher;
use crate::graph::{StateGraph, build_nondeterministic};
use crate::path::Path;
use crate::search::explore;

/// Nondeterministic finite automaton.
///
/// A pair (state, input) may lead to any number of states, and
/// [`Input::Epsilon`](gold_core::Input::Epsilon) moves are tried from every
/// configuration. A handler that fails, or produces nothing, simply
/// contributes no transition.
#[derive(Debug)]
pub struct NondeterministicAutomaton {
    definition: Definition,
    delta: Dispatcher,
    graph: StateGraph,
    config: SearchConfig,
}

impl NondeterministicAutomaton {
    pub fn new<S, SI, F, FI>(
        states: S,
        alphabet: impl Into<Alphabet>,
        initial: impl Into<State>,
        finals: F,
        delta: Dispatcher,
    ) -> Result<Self, AutomataError>
    where
        S: IntoIterator<Item = SI>,
        SI: Into<State>,
        F: IntoIterator<Item = FI>,
        FI: Into<State>,
    {
        let definition = Definition::new(states, alphabet, initial, finals)?;
        Self::from_definition(definition, delta)
    }

    pub fn from_definition(definition: Definition, delta: Dispatcher) -> Result<Self, AutomataError> {
        let graph = build_nondeterministic(&definition, &delta)?;
        debug!(
            kind = "nondeterministic",
            relation = delta.name(),
            states = definition.states().len(),
            edges = graph.edges().len(),
            "automaton built"
        );
        Ok(Self {
            definition,
            delta,
            graph,
            config: SearchConfig::default(),
        })
    }

    /// Use `config` for subsequent queries.
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn delta(&self) -> &Dispatcher {
        &self.delta
    }
}

impl Acceptor for NondeterministicAutomaton {
    fn definition(&self) -> &Definition {
        &self.definition
    }

    fn graph(&self) -> &StateGraph {
        &self.graph
    }

    fn accepts_with_path(&self, tape: &str) -> Result<(bool, Path), AutomataError> {
        let symbols = self.definition.alphabet().read_tape(tape)?;
        let outcome = explore(
            &self.definition,
            &symbols,
            self.definition.initial().clone(),
            &self.config,
            |state: &State, input| self.delta.invoke_lenient(state, input),
        );
        Ok((outcome.accepted, outcome.path))
    }
}
