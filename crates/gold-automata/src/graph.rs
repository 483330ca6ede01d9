// Transition graph construction and validation
//
// Deterministic and nondeterministic automata evaluate their transition
// relation over the whole `states x alphabet` product once, at construction.
// The result is kept as a read-only graph for exporters; a deterministic
// automaton additionally keeps the product as its transition table.

use std::collections::BTreeMap;

use gold_core::{AutomataError, Input, State};
use hashbrown::HashMap;
use tracing::warn;

use crate::definition::Definition;
use crate::dispatch::Dispatcher;

/// Edge between two states, labelled with every input that takes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Edge {
    pub source: State,
    pub target: State,
    pub symbols: Vec<Input>,
}

impl Edge {
    /// Comma-joined symbol list, e.g. `a, b` or `λ`.
    pub fn label(&self) -> String {
        self.symbols
            .iter()
            .map(Input::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validated transition graph, exposed for diagram exporters.
///
/// Nodes are the declared states in ascending order; edges are ordered by
/// (source, target).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateGraph {
    nodes: Vec<State>,
    edges: Vec<Edge>,
}

impl StateGraph {
    pub fn nodes(&self) -> &[State] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, source: &State, target: &State) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| &e.source == source && &e.target == target)
    }

    /// Edges leaving `source`.
    pub fn outgoing<'a>(&'a self, source: &'a State) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == source)
    }
}

/// Accumulates edges keyed by (source, target).
pub(crate) struct GraphBuilder {
    nodes: Vec<State>,
    edges: BTreeMap<(State, State), Vec<Input>>,
}

impl GraphBuilder {
    pub(crate) fn new(definition: &Definition) -> Self {
        Self {
            nodes: definition.sorted_states().into_iter().cloned().collect(),
            edges: BTreeMap::new(),
        }
    }

    pub(crate) fn add_edge(&mut self, source: &State, target: &State, input: Input) {
        let symbols = self
            .edges
            .entry((source.clone(), target.clone()))
            .or_default();
        if !symbols.contains(&input) {
            symbols.push(input);
        }
    }

    pub(crate) fn finish(self) -> StateGraph {
        let edges = self
            .edges
            .into_iter()
            .map(|((source, target), mut symbols)| {
                symbols.sort_unstable();
                Edge {
                    source,
                    target,
                    symbols,
                }
            })
            .collect();
        StateGraph {
            nodes: self.nodes,
            edges,
        }
    }
}

/// Transition table of a deterministic automaton, one row per state.
pub(crate) type TransitionTable = HashMap<State, HashMap<char, State>>;

/// Evaluate a deterministic relation over `states x alphabet`.
///
/// Every pair must yield exactly one declared target. Handler failures are
/// construction errors.
pub(crate) fn build_deterministic(
    definition: &Definition,
    delta: &Dispatcher,
) -> Result<(StateGraph, TransitionTable), AutomataError> {
    let mut graph = GraphBuilder::new(definition);
    let mut table = TransitionTable::new();
    let symbols = definition.alphabet().sorted();

    for state in definition.sorted_states() {
        for &symbol in &symbols {
            let input = Input::Symbol(symbol);
            let mut targets = delta.invoke(state, input)?;
            let target = match targets.len() {
                0 => {
                    return Err(AutomataError::NoTransition {
                        state: state.clone(),
                        symbol: input,
                    });
                }
                1 => targets.remove(0),
                _ => {
                    return Err(AutomataError::AmbiguousTransition {
                        state: state.clone(),
                        symbol: input,
                        targets,
                    });
                }
            };
            if !definition.contains(&target) {
                return Err(AutomataError::UnknownTargetState {
                    state: state.clone(),
                    symbol: input,
                    target,
                });
            }
            graph.add_edge(state, &target, input);
            table.entry(state.clone()).or_default().insert(symbol, target);
        }
    }

    Ok((graph.finish(), table))
}

/// Evaluate a nondeterministic relation over `states x alphabet`, and record
/// the epsilon moves of each state for export.
///
/// Any number of targets is allowed per symbol pair, but each must be
/// declared, and handler failures are construction errors. Epsilon moves are
/// optional: a failing handler means "no move" and undeclared targets are
/// skipped, as they are during search.
pub(crate) fn build_nondeterministic(
    definition: &Definition,
    delta: &Dispatcher,
) -> Result<StateGraph, AutomataError> {
    let mut graph = GraphBuilder::new(definition);
    let symbols = definition.alphabet().sorted();

    for state in definition.sorted_states() {
        for &symbol in &symbols {
            let input = Input::Symbol(symbol);
            let mut targets = delta.invoke(state, input)?;
            targets.sort();
            targets.dedup();
            for target in &targets {
                if !definition.contains(target) {
                    return Err(AutomataError::UnknownTargetState {
                        state: state.clone(),
                        symbol: input,
                        target: target.clone(),
                    });
                }
                graph.add_edge(state, target, input);
            }
        }

        let mut targets = delta.invoke_lenient(state, Input::Epsilon)?;
        targets.sort();
        targets.dedup();
        for target in &targets {
            if definition.contains(target) {
                graph.add_edge(state, target, Input::Epsilon);
            } else {
                warn!(%state, %target, "epsilon move to undeclared state not recorded");
            }
        }
    }

    Ok(graph.finish())
}

/// Graph of a pushdown automaton: its transitions depend on the stack, so
/// only the declared states are recorded.
pub(crate) fn nodes_only(definition: &Definition) -> StateGraph {
    GraphBuilder::new(definition).finish()
}
