// Error types shared by the dispatcher, the stack and the automata

use crate::state::{StackSymbol, State};
use crate::symbol::Input;

/// Failure of an expect-exact stack operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("stack mismatch: expected {expected}, found {found}")]
    Mismatch {
        expected: StackSymbol,
        found: StackSymbol,
    },
    #[error("stack underflow: expected {expected}, found an empty stack")]
    Underflow { expected: StackSymbol },
}

/// Failure raised from inside a transition handler.
///
/// During nondeterministic search these only ever kill the branch that
/// raised them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error("no path: {0}")]
    Rejected(String),
}

impl StepError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        StepError::Rejected(reason.into())
    }
}

/// Error resolving or invoking a transition relation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("not enough arguments supplied to `{name}`: got {given}, need at least {min}")]
    InsufficientArity {
        name: String,
        given: usize,
        min: usize,
    },
    #[error("no definition of `{name}` takes {arity} parameters")]
    NoHandlerForArity { name: String, arity: usize },
    #[error("handler of `{name}` failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: StepError,
    },
}

/// Error type for automaton construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomataError {
    #[error("symbol {0:?} is not in the alphabet of the automaton")]
    SymbolNotInAlphabet(char),
    #[error("no transition defined for symbol {symbol} from state {state}")]
    NoTransition { state: State, symbol: Input },
    #[error("{} transitions found for symbol {symbol} from state {state}, expected exactly one", .targets.len())]
    AmbiguousTransition {
        state: State,
        symbol: Input,
        targets: Vec<State>,
    },
    #[error("state {target} reached from state {state} on symbol {symbol} is not a declared state")]
    UnknownTargetState {
        state: State,
        symbol: Input,
        target: State,
    },
    #[error("state {0} is not a declared state")]
    UnknownState(State),
    #[error("no output defined for symbol {symbol} from state {state}")]
    NoOutput { state: State, symbol: char },
    #[error("{count} outputs defined for symbol {symbol} from state {state}, expected exactly one")]
    AmbiguousOutput {
        state: State,
        symbol: char,
        count: usize,
    },
    #[error("output tape has symbols missing from the output alphabet: {}", format_symbols(.0))]
    OutputSymbolsNotInAlphabet(Vec<char>),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn format_symbols(symbols: &[char]) -> String {
    symbols
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_error_converts_into_step_error() {
        let err: StepError = StackError::Underflow {
            expected: State::from(1),
        }
        .into();
        assert!(matches!(err, StepError::Stack(StackError::Underflow { .. })));
    }

    #[test]
    fn messages_name_the_offending_pair() {
        let err = AutomataError::NoTransition {
            state: State::from((0, 2)),
            symbol: Input::Symbol('a'),
        };
        assert_eq!(
            err.to_string(),
            "no transition defined for symbol a from state (0, 2)"
        );

        let err = AutomataError::AmbiguousTransition {
            state: State::from(1),
            symbol: Input::Symbol('b'),
            targets: vec![State::from(2), State::from(3)],
        };
        assert!(err.to_string().starts_with("2 transitions found"));
    }

    #[test]
    fn output_symbols_are_listed() {
        let err = AutomataError::OutputSymbolsNotInAlphabet(vec!['x', 'y']);
        assert!(err.to_string().ends_with("x, y"));
    }

    #[test]
    fn dispatch_error_wraps_handler_failure() {
        let err = DispatchError::Handler {
            name: "delta".to_string(),
            source: StepError::rejected("dead end"),
        };
        assert_eq!(err.to_string(), "handler of `delta` failed: no path: dead end");
        let top: AutomataError = err.into();
        assert!(matches!(top, AutomataError::Dispatch(_)));
    }
}
