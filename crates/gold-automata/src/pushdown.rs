// Pushdown automata
//
// Transitions depend on the branch's stack, so there is no product check at
// construction: targets are validated lazily while searching, and a handler
// failure (a mismatched pop included) only kills the branch it ran on.

use gold_core::{Alphabet, AutomataError, DispatchError, Input, State};
use tracing::debug;

use crate::Acceptor;
use crate::config::SearchConfig;
use crate::definition::Definition;
use crate::dispatch::PushdownDispatcher;
use crate::graph::{StateGraph, nodes_only};
use crate::path::Path;
use crate::search::{PushdownBranch, explore};
use crate::stack::AutomatonStack;

/// Nondeterministic pushdown automaton.
///
/// Accepts when some branch has consumed the whole tape in a final state
/// with an empty stack.
#[derive(Debug)]
pub struct PushdownAutomaton {
    definition: Definition,
    delta: PushdownDispatcher,
    graph: StateGraph,
    config: SearchConfig,
}

impl PushdownAutomaton {
    pub fn new<S, SI, F, FI>(
        states: S,
        alphabet: impl Into<Alphabet>,
        initial: impl Into<State>,
        finals: F,
        delta: PushdownDispatcher,
    ) -> Result<Self, AutomataError>
    where
        S: IntoIterator<Item = SI>,
        SI: Into<State>,
        F: IntoIterator<Item = FI>,
        FI: Into<State>,
    {
        let definition = Definition::new(states, alphabet, initial, finals)?;
        Ok(Self::from_definition(definition, delta))
    }

    pub fn from_definition(definition: Definition, delta: PushdownDispatcher) -> Self {
        let graph = nodes_only(&definition);
        debug!(
            kind = "pushdown",
            relation = delta.name(),
            states = definition.states().len(),
            "automaton built"
        );
        Self {
            definition,
            delta,
            graph,
            config: SearchConfig::default(),
        }
    }

    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn delta(&self) -> &PushdownDispatcher {
        &self.delta
    }

    fn step(
        &self,
        branch: &PushdownBranch,
        input: Input,
    ) -> Result<Vec<PushdownBranch>, DispatchError> {
        let next = self.delta.invoke_lenient(&branch.state, &branch.stack, input)?;
        Ok(next
            .into_iter()
            .map(|(state, stack)| PushdownBranch { state, stack })
            .collect())
    }
}

impl Acceptor for PushdownAutomaton {
    fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Declared states only; edges depend on the stack.
    fn graph(&self) -> &StateGraph {
        &self.graph
    }

    fn accepts_with_path(&self, tape: &str) -> Result<(bool, Path), AutomataError> {
        let symbols = self.definition.alphabet().read_tape(tape)?;
        let root = PushdownBranch {
            state: self.definition.initial().clone(),
            stack: AutomatonStack::new(),
        };
        let outcome = explore(&self.definition, &symbols, root, &self.config, |branch, input| {
            self.step(branch, input)
        });
        Ok((outcome.accepted, outcome.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Step, to};
    use gold_core::StepError;

    fn int(state: &State) -> i64 {
        state.as_int().unwrap_or_default()
    }

    fn no_path() -> Step {
        Err(StepError::rejected("no path found"))
    }

    /// Push on the first symbol, then pop one or two, reaching 3 on an
    /// empty stack only after exactly three symbols.
    fn three_step() -> PushdownAutomaton {
        let delta = PushdownDispatcher::new("delta")
            .on_state(|s, stack, input| {
                if input.is_epsilon() {
                    return to(0);
                }
                match int(s) {
                    0 => {
                        stack.push([1]);
                        to(1)
                    }
                    1 => {
                        stack.pop([1])?;
                        to(2)
                    }
                    2 => {
                        stack.pop([1, 1])?;
                        to(3)
                    }
                    3 => {
                        stack.pop([1])?;
                        no_path()
                    }
                    _ => no_path(),
                }
            })
            .on_state(|s, stack, input| {
                if input.is_epsilon() {
                    return to(0);
                }
                if int(s) == 1 {
                    stack.push([1]);
                    return to(2);
                }
                no_path()
            });
        PushdownAutomaton::new([0, 1, 2, 3], "a", 0, [3], delta).unwrap()
    }

    #[test]
    fn three_step_verdicts() {
        let pda = three_step();
        assert!(!pda.accepts("").unwrap());
        assert!(!pda.accepts("a").unwrap());
        assert!(!pda.accepts("aa").unwrap());
        assert!(pda.accepts("aaa").unwrap());
    }

    #[test]
    fn three_step_in_parallel() {
        let pda = three_step().with_search_config(SearchConfig::parallel(4));
        assert!(!pda.accepts("aa").unwrap());
        assert!(pda.accepts("aaa").unwrap());
    }

    #[test]
    fn accepting_path_carries_stacks() {
        let (accepted, path) = three_step().accepts_with_path("aaa").unwrap();
        assert!(accepted);
        let last = path.last().unwrap();
        assert_eq!(last.state, State::from(3));
        assert!(last.stack.as_ref().unwrap().is_empty());
        assert!(path[0].stack.as_ref().unwrap().is_empty());
        assert_eq!(path[0].remaining, "aaa");
    }

    /// The only move from 1 pops a symbol that was never pushed.
    fn mismatched_pop() -> PushdownAutomaton {
        let delta = PushdownDispatcher::new("delta").on_state(|s, stack, input| {
            match (int(s), input) {
                (0, Input::Symbol(_)) => {
                    stack.push(["x"]);
                    to(1)
                }
                (1, Input::Symbol(_)) => {
                    stack.pop(["y"])?;
                    to(2)
                }
                _ => Ok(None),
            }
        });
        PushdownAutomaton::new([0, 1, 2], "a", 0, [2], delta).unwrap()
    }

    #[test]
    fn mismatched_pop_rejects_quietly() {
        for config in [SearchConfig::sequential(), SearchConfig::parallel(2)] {
            let pda = mismatched_pop().with_search_config(config);
            assert_eq!(pda.accepts("aa"), Ok(false));
        }
    }

    #[test]
    fn final_state_needs_empty_stack() {
        let delta = PushdownDispatcher::new("delta").on_state(|_, stack, input| match input {
            Input::Symbol(_) => {
                stack.push(["x"]);
                to(1)
            }
            Input::Epsilon => Ok(None),
        });
        let pda = PushdownAutomaton::new([0, 1], "a", 0, [1], delta).unwrap();
        assert!(!pda.accepts("a").unwrap());
    }

    #[test]
    fn peek_gates_transitions() {
        // Balanced a^n b^n, with peek guarding the switch to popping.
        let delta = PushdownDispatcher::new("delta").on_state(|s, stack, input| {
            match (int(s), input) {
                (0, Input::Symbol('a')) => {
                    stack.push(["a"]);
                    to(0)
                }
                (0 | 1, Input::Symbol('b')) if stack.peek(["a"]) => {
                    stack.pop(["a"])?;
                    to(1)
                }
                _ => Ok(None),
            }
        });
        let pda = PushdownAutomaton::new([0, 1], "ab", 0, [0, 1], delta).unwrap();
        assert!(pda.accepts("aabb").unwrap());
        assert!(!pda.accepts("aab").unwrap());
        assert!(!pda.accepts("abab").unwrap());
    }

    #[test]
    fn undeclared_target_drops_the_branch() {
        let delta = PushdownDispatcher::new("delta")
            .on_state(|_, _, input| match input {
                Input::Symbol(_) => to(42),
                Input::Epsilon => Ok(None),
            })
            .on_state(|_, _, input| match input {
                Input::Symbol(_) => to(1),
                Input::Epsilon => Ok(None),
            });
        let pda = PushdownAutomaton::new([0, 1], "a", 0, [1], delta).unwrap();
        assert!(pda.accepts("a").unwrap());
    }

    #[test]
    fn graph_lists_states_without_edges() {
        let pda = three_step();
        assert_eq!(pda.graph().nodes().len(), 4);
        assert!(pda.graph().edges().is_empty());
    }
}
