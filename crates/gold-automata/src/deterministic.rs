// Deterministic automata and Mealy transducers
//
// The transition product is evaluated and validated once at construction
// (see `graph::build_deterministic`); queries then walk the cached table.

use gold_core::{Alphabet, AutomataError, Input, State};
use hashbrown::HashSet;
use tracing::debug;

use crate::Acceptor;
use crate::definition::Definition;
use crate::dispatch::Dispatcher;
use crate::graph::{StateGraph, TransitionTable, build_deterministic};
use crate::path::{Path, PathStep};

/// Deterministic finite automaton.
///
/// Construction fails unless every (state, symbol) pair has exactly one
/// transition into a declared state, so a query never gets stuck.
#[derive(Debug)]
pub struct DeterministicAutomaton {
    definition: Definition,
    delta: Dispatcher,
    table: TransitionTable,
    graph: StateGraph,
}

impl DeterministicAutomaton {
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
        let (graph, table) = build_deterministic(&definition, &delta)?;
        debug!(
            kind = "deterministic",
            relation = delta.name(),
            states = definition.states().len(),
            edges = graph.edges().len(),
            "automaton built"
        );
        Ok(Self {
            definition,
            delta,
            table,
            graph,
        })
    }

    /// The relation the automaton was built from.
    pub fn delta(&self) -> &Dispatcher {
        &self.delta
    }

    #[inline]
    fn next(&self, state: &State, symbol: char) -> Result<&State, AutomataError> {
        self.table
            .get(state)
            .and_then(|row| row.get(&symbol))
            .ok_or_else(|| AutomataError::NoTransition {
                state: state.clone(),
                symbol: Input::Symbol(symbol),
            })
    }

    /// Walk `tape` from the initial state and return the state reached.
    pub fn run(&self, tape: &str) -> Result<State, AutomataError> {
        let symbols = self.definition.alphabet().read_tape(tape)?;
        let mut state = self.definition.initial();
        for symbol in symbols {
            state = self.next(state, symbol)?;
        }
        Ok(state.clone())
    }
}

impl Acceptor for DeterministicAutomaton {
    fn definition(&self) -> &Definition {
        &self.definition
    }

    fn graph(&self) -> &StateGraph {
        &self.graph
    }

    fn accepts(&self, tape: &str) -> Result<bool, AutomataError> {
        let state = self.run(tape)?;
        Ok(self.definition.is_final(&state))
    }

    fn accepts_with_path(&self, tape: &str) -> Result<(bool, Path), AutomataError> {
        let symbols = self.definition.alphabet().read_tape(tape)?;
        if symbols.is_empty() {
            return Ok((self.definition.is_final(self.definition.initial()), Path::new()));
        }

        let mut state = self.definition.initial();
        let mut path = Vec::with_capacity(symbols.len() + 1);
        path.push(PathStep {
            state: state.clone(),
            remaining: tape.to_string(),
            via: None,
            stack: None,
        });
        for (consumed, &symbol) in symbols.iter().enumerate() {
            state = self.next(state, symbol)?;
            path.push(PathStep {
                state: state.clone(),
                remaining: symbols[consumed + 1..].iter().collect(),
                via: Some(Input::Symbol(symbol)),
                stack: None,
            });
        }

        if self.definition.is_final(state) {
            Ok((true, path))
        } else {
            Ok((false, Path::new()))
        }
    }
}

/// Deterministic automaton that emits one output symbol per input symbol.
///
/// The output relation is called on the current state before each move and
/// must produce exactly one symbol. Membership of the produced symbols in the
/// output alphabet is checked once the whole tape has been processed.
#[derive(Debug)]
pub struct DeterministicTransducer {
    automaton: DeterministicAutomaton,
    output_alphabet: Alphabet,
    output: Dispatcher<char>,
}

impl DeterministicTransducer {
    pub fn new<S, SI, F, FI>(
        states: S,
        alphabet: impl Into<Alphabet>,
        output_alphabet: impl Into<Alphabet>,
        initial: impl Into<State>,
        finals: F,
        delta: Dispatcher,
        output: Dispatcher<char>,
    ) -> Result<Self, AutomataError>
    where
        S: IntoIterator<Item = SI>,
        SI: Into<State>,
        F: IntoIterator<Item = FI>,
        FI: Into<State>,
    {
        let automaton = DeterministicAutomaton::new(states, alphabet, initial, finals, delta)?;
        Ok(Self {
            automaton,
            output_alphabet: output_alphabet.into(),
            output,
        })
    }

    /// The underlying acceptor, for queries that ignore output.
    pub fn automaton(&self) -> &DeterministicAutomaton {
        &self.automaton
    }

    pub fn output_alphabet(&self) -> &Alphabet {
        &self.output_alphabet
    }

    fn emit(&self, state: &State, symbol: char) -> Result<char, AutomataError> {
        let mut produced = self.output.invoke(state, Input::Symbol(symbol))?;
        match produced.len() {
            0 => Err(AutomataError::NoOutput {
                state: state.clone(),
                symbol,
            }),
            1 => Ok(produced.remove(0)),
            count => Err(AutomataError::AmbiguousOutput {
                state: state.clone(),
                symbol,
                count,
            }),
        }
    }

    /// Translate `tape`, returning the output tape and whether the run
    /// ended in a final state.
    pub fn transduce(&self, tape: &str) -> Result<(String, bool), AutomataError> {
        let definition = &self.automaton.definition;
        let symbols = definition.alphabet().read_tape(tape)?;

        let mut state = definition.initial();
        let mut output = String::with_capacity(symbols.len());
        for symbol in symbols {
            output.push(self.emit(state, symbol)?);
            state = self.automaton.next(state, symbol)?;
        }

        let mut missing: Vec<char> = output
            .chars()
            .filter(|&c| !self.output_alphabet.contains(c))
            .collect::<HashSet<char>>()
            .into_iter()
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(AutomataError::OutputSymbolsNotInAlphabet(missing));
        }

        Ok((output, definition.is_final(state)))
    }
}

impl Acceptor for DeterministicTransducer {
    fn definition(&self) -> &Definition {
        self.automaton.definition()
    }

    fn graph(&self) -> &StateGraph {
        self.automaton.graph()
    }

    fn accepts(&self, tape: &str) -> Result<bool, AutomataError> {
        self.automaton.accepts(tape)
    }

    fn accepts_with_path(&self, tape: &str) -> Result<(bool, Path), AutomataError> {
        self.automaton.accepts_with_path(tape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::to;
    use gold_core::sets::{product, union};
    use gold_core::{DispatchError, StepError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn int(state: &State) -> i64 {
        state.as_int().unwrap_or_default()
    }

    /// 0..=3 plus every (n, 2).
    fn mod_four_states() -> Vec<State> {
        let scalars: Vec<State> = (0..4).map(State::from).collect();
        let pairs = product(&[scalars.clone(), vec![State::from(2)]]);
        let mut states: Vec<State> = union([scalars, pairs]).into_iter().collect();
        states.sort();
        states
    }

    /// Even states detour through (n, 2); odd states count up modulo 4.
    fn mod_four_delta() -> Dispatcher {
        Dispatcher::new("delta")
            .on_state(|s, _| {
                let n = int(s);
                if n % 2 == 0 { to((n, 2)) } else { to((n + 1) % 4) }
            })
            .on_pair(|s, extra, _| to((int(s) + int(extra) + 1) % 4))
    }

    fn mod_four_output() -> Dispatcher<char> {
        Dispatcher::new("trans")
            .on_state(|s, _| Ok(Some(if int(s) % 2 == 0 { 'a' } else { 'b' })))
            .on_pair(|_, _, _| Ok(Some('c')))
    }

    fn mod_four() -> DeterministicAutomaton {
        DeterministicAutomaton::new(mod_four_states(), "a", 0, [3], mod_four_delta()).unwrap()
    }

    #[test]
    fn mod_four_verdicts() {
        let dfa = mod_four();
        assert!(!dfa.accepts("").unwrap());
        assert!(!dfa.accepts("a").unwrap());
        assert!(dfa.accepts("aa").unwrap());
        assert!(!dfa.accepts("aaa").unwrap());
    }

    #[test]
    fn run_reports_reached_state() {
        let dfa = mod_four();
        assert_eq!(dfa.run("").unwrap(), State::from(0));
        assert_eq!(dfa.run("a").unwrap(), State::from((0, 2)));
        assert_eq!(dfa.run("aaa").unwrap(), State::from(0));
    }

    #[test]
    fn graph_has_one_edge_per_state() {
        let dfa = mod_four();
        assert_eq!(dfa.graph().nodes().len(), 8);
        assert_eq!(dfa.graph().edges().len(), 8);
        let edge = dfa
            .graph()
            .edge(&State::from((0, 2)), &State::from(3))
            .unwrap();
        assert_eq!(edge.label(), "a");
    }

    #[test]
    fn accepting_path_follows_the_run() {
        let (accepted, path) = mod_four().accepts_with_path("aa").unwrap();
        assert!(accepted);
        let states: Vec<String> = path.iter().map(|s| s.state.to_string()).collect();
        assert_eq!(states, vec!["0", "(0, 2)", "3"]);
        assert_eq!(path[1].remaining, "a");
        assert_eq!(path[2].via, Some(Input::Symbol('a')));

        let (accepted, path) = mod_four().accepts_with_path("a").unwrap();
        assert!(!accepted);
        assert!(path.is_empty());
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let err = mod_four().accepts("ab").unwrap_err();
        assert_eq!(err, AutomataError::SymbolNotInAlphabet('b'));
    }

    #[test]
    fn construction_calls_delta_once_per_pair() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let delta = Dispatcher::new("delta").on_state(move |s, _| {
            counter.fetch_add(1, Ordering::Relaxed);
            to((int(s) + 1) % 3)
        });
        let dfa = DeterministicAutomaton::new([0, 1, 2], "ab", 0, [0], delta).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 6);

        // Queries use the cached table.
        assert!(!dfa.accepts("abab").unwrap());
        assert!(dfa.accepts("aba").unwrap());
        assert_eq!(calls.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn construction_rejects_unknown_target() {
        let delta = Dispatcher::new("delta").on_state(|_, _| to(9));
        let err = DeterministicAutomaton::new([0, 1], "a", 0, [1], delta).unwrap_err();
        assert_eq!(
            err,
            AutomataError::UnknownTargetState {
                state: State::from(0),
                symbol: Input::Symbol('a'),
                target: State::from(9),
            }
        );
    }

    #[test]
    fn construction_rejects_missing_tuple_handler() {
        // (0, 2) is declared but nothing handles pair states.
        let delta = Dispatcher::new("delta").on_state(|_, _| to(0));
        let err =
            DeterministicAutomaton::new(mod_four_states(), "a", 0, [3], delta).unwrap_err();
        assert!(matches!(
            err,
            AutomataError::Dispatch(DispatchError::NoHandlerForArity { arity: 3, .. })
        ));
    }

    #[test]
    fn construction_propagates_handler_failure() {
        let delta = Dispatcher::new("delta").on_state(|s, _| {
            if int(s) == 1 {
                Err(StepError::rejected("broken"))
            } else {
                to(1)
            }
        });
        let err = DeterministicAutomaton::new([0, 1], "a", 0, [1], delta).unwrap_err();
        assert!(matches!(
            err,
            AutomataError::Dispatch(DispatchError::Handler { .. })
        ));
    }

    fn mod_four_transducer(output_alphabet: &str) -> DeterministicTransducer {
        DeterministicTransducer::new(
            mod_four_states(),
            "a",
            output_alphabet,
            0,
            [3],
            mod_four_delta(),
            mod_four_output(),
        )
        .unwrap()
    }

    #[test]
    fn transducer_emits_one_symbol_per_input() {
        let transducer = mod_four_transducer("abc");
        assert_eq!(transducer.transduce("").unwrap(), (String::new(), false));
        assert_eq!(transducer.transduce("a").unwrap(), ("a".to_string(), false));
        assert_eq!(transducer.transduce("aa").unwrap(), ("ac".to_string(), true));
        assert_eq!(transducer.transduce("aaa").unwrap(), ("acb".to_string(), false));
        assert_eq!(transducer.transduce("aaaa").unwrap(), ("acba".to_string(), false));
    }

    #[test]
    fn output_alphabet_is_checked_after_the_whole_tape() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let output = Dispatcher::new("trans")
            .on_state(move |_, _| {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(Some('z'))
            })
            .on_pair(|_, _, _| Ok(Some('y')));
        let transducer = DeterministicTransducer::new(
            mod_four_states(),
            "a",
            "ab",
            0,
            [3],
            mod_four_delta(),
            output,
        )
        .unwrap();

        let err = transducer.transduce("aaa").unwrap_err();
        assert_eq!(err, AutomataError::OutputSymbolsNotInAlphabet(vec!['y', 'z']));
        // Both scalar steps ran before the error was raised.
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn output_relation_must_produce_exactly_one_symbol() {
        let silent = Dispatcher::new("trans")
            .on_state(|_, _| Ok(None))
            .on_pair(|_, _, _| Ok(Some('c')));
        let transducer = DeterministicTransducer::new(
            mod_four_states(),
            "a",
            "abc",
            0,
            [3],
            mod_four_delta(),
            silent,
        )
        .unwrap();
        assert_eq!(
            transducer.transduce("a").unwrap_err(),
            AutomataError::NoOutput {
                state: State::from(0),
                symbol: 'a',
            }
        );

        let chatty = mod_four_output().on_state(|_, _| Ok(Some('b')));
        let transducer = DeterministicTransducer::new(
            mod_four_states(),
            "a",
            "abc",
            0,
            [3],
            mod_four_delta(),
            chatty,
        )
        .unwrap();
        assert!(matches!(
            transducer.transduce("a").unwrap_err(),
            AutomataError::AmbiguousOutput { count: 2, .. }
        ));
    }

    #[test]
    fn transducer_is_an_acceptor() {
        let transducer = mod_four_transducer("abc");
        assert!(transducer.accepts("aa").unwrap());
        assert_eq!(transducer.graph().nodes().len(), 8);
    }
}
