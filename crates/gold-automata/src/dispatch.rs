// Arity-keyed transition dispatch
//
// A transition relation is a named table from parameter count to the
// handlers registered with that count. A call explodes a tuple state into
// positional parameters, picks the handlers whose arity matches exactly and
// runs all of them, collecting every result they produce.

use std::fmt;

use gold_core::{DispatchError, Input, State, StepError};
use hashbrown::HashMap;
use tracing::trace;

use crate::stack::AutomatonStack;

/// Result of a single handler: a next value, no transition, or a failure.
pub type Step<T = State> = Result<Option<T>, StepError>;

/// Shorthand for a handler result that moves to `state`.
#[inline]
pub fn to(state: impl Into<State>) -> Step {
    Ok(Some(state.into()))
}

/// Minimum parameter count of plain and transducer relations: one state
/// component plus the symbol.
pub const MIN_ARITY: usize = 2;

/// Minimum parameter count of pushdown relations: one state component, the
/// stack and the symbol.
pub const MIN_PUSHDOWN_ARITY: usize = 3;

type Handler<T> = Box<dyn Fn(&[State], Input) -> Step<T> + Send + Sync>;

type PushdownHandler = Box<dyn Fn(&[State], &mut AutomatonStack, Input) -> Step + Send + Sync>;

/// What a combination policy does with a handler that fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    /// Abort the whole call with [`DispatchError::Handler`].
    Propagate,
    /// Drop the failing handler's contribution and keep going.
    Skip,
}

/// Handlers grouped by parameter count.
struct Registry<H> {
    name: String,
    min_arity: usize,
    handlers: HashMap<usize, Vec<H>>,
}

impl<H> Registry<H> {
    fn new(name: String, min_arity: usize) -> Self {
        Self {
            name,
            min_arity,
            handlers: HashMap::new(),
        }
    }

    fn insert(&mut self, arity: usize, handler: H) {
        self.handlers.entry(arity).or_default().push(handler);
    }

    fn resolve(&self, arity: usize) -> Result<&[H], DispatchError> {
        if arity < self.min_arity {
            return Err(DispatchError::InsufficientArity {
                name: self.name.clone(),
                given: arity,
                min: self.min_arity,
            });
        }
        match self.handlers.get(&arity) {
            Some(handlers) if !handlers.is_empty() => Ok(handlers),
            _ => Err(DispatchError::NoHandlerForArity {
                name: self.name.clone(),
                arity,
            }),
        }
    }

    fn arities(&self) -> Vec<usize> {
        let mut arities: Vec<usize> = self.handlers.keys().copied().collect();
        arities.sort_unstable();
        arities
    }

    /// Apply the failure policy to one handler's outcome.
    fn settle<T>(&self, step: Step<T>, policy: OnFailure) -> Result<Option<T>, DispatchError> {
        match step {
            Ok(result) => Ok(result),
            Err(source) => match policy {
                OnFailure::Propagate => Err(DispatchError::Handler {
                    name: self.name.clone(),
                    source,
                }),
                OnFailure::Skip => {
                    trace!(relation = %self.name, error = %source, "handler failed, skipping");
                    Ok(None)
                }
            },
        }
    }
}

impl<H> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("min_arity", &self.min_arity)
            .field("arities", &self.arities())
            .finish()
    }
}

/// Transition relation of deterministic and nondeterministic automata, or
/// the output relation of a transducer (`T = char`).
///
/// Arity counts every parameter a handler declares, the trailing symbol
/// included: a handler over scalar states has arity 2, one over pair states
/// arity 3.
///
/// ```
/// use gold_automata::dispatch::{Dispatcher, to};
/// use gold_core::{Input, State};
///
/// let delta = Dispatcher::new("delta")
///     .on_state(|_, _| to(0))
///     .on_pair(|_, _, _| to(1));
///
/// assert_eq!(delta.invoke(&State::from(5), Input::Symbol('a')).unwrap(), vec![State::from(0)]);
/// assert_eq!(delta.invoke(&State::from((5, 6)), Input::Symbol('a')).unwrap(), vec![State::from(1)]);
/// ```
pub struct Dispatcher<T = State> {
    registry: Registry<Handler<T>>,
}

impl<T> Dispatcher<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            registry: Registry::new(name.into(), MIN_ARITY),
        }
    }

    /// Register a handler taking `arity - 1` state components and the symbol.
    pub fn register<F>(&mut self, arity: usize, handler: F) -> &mut Self
    where
        F: Fn(&[State], Input) -> Step<T> + Send + Sync + 'static,
    {
        self.registry.insert(arity, Box::new(handler));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, arity: usize, handler: F) -> Self
    where
        F: Fn(&[State], Input) -> Step<T> + Send + Sync + 'static,
    {
        self.register(arity, handler);
        self
    }

    /// Register a handler over atomic states (arity 2).
    pub fn on_state<F>(self, handler: F) -> Self
    where
        F: Fn(&State, Input) -> Step<T> + Send + Sync + 'static,
    {
        self.with(2, move |args, input| handler(&args[0], input))
    }

    /// Register a handler over two-component tuple states (arity 3).
    pub fn on_pair<F>(self, handler: F) -> Self
    where
        F: Fn(&State, &State, Input) -> Step<T> + Send + Sync + 'static,
    {
        self.with(3, move |args, input| handler(&args[0], &args[1], input))
    }

    pub fn name(&self) -> &str {
        &self.registry.name
    }

    /// Parameter counts that have at least one handler, ascending.
    pub fn arities(&self) -> Vec<usize> {
        self.registry.arities()
    }

    /// Call the relation with explicit positional state components.
    ///
    /// Every handler registered for `args.len() + 1` parameters runs; `None`
    /// results contribute nothing. The first handler failure aborts the call.
    pub fn call(&self, args: &[State], input: Input) -> Result<Vec<T>, DispatchError> {
        self.combine(args, input, OnFailure::Propagate)
    }

    /// Call the relation on `state`, exploding tuple states into components.
    pub fn invoke(&self, state: &State, input: Input) -> Result<Vec<T>, DispatchError> {
        self.combine(state.components(), input, OnFailure::Propagate)
    }

    /// Like [`invoke`](Self::invoke), but a failing handler only loses its
    /// own contribution. Resolution errors are still returned.
    pub fn invoke_lenient(&self, state: &State, input: Input) -> Result<Vec<T>, DispatchError> {
        self.combine(state.components(), input, OnFailure::Skip)
    }

    fn combine(
        &self,
        args: &[State],
        input: Input,
        policy: OnFailure,
    ) -> Result<Vec<T>, DispatchError> {
        let handlers = self.registry.resolve(args.len() + 1)?;
        let mut results = Vec::with_capacity(handlers.len());
        for handler in handlers {
            if let Some(next) = self.registry.settle(handler(args, input), policy)? {
                results.push(next);
            }
        }
        Ok(results)
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dispatcher").field(&self.registry).finish()
    }
}

/// Transition relation of pushdown automata.
///
/// Handlers receive the state components, a private copy of the branch's
/// stack and the symbol. Each handler gets its own copy, so handlers
/// registered together never observe one another's stack operations; a
/// produced state is paired with the copy its handler left behind.
pub struct PushdownDispatcher {
    registry: Registry<PushdownHandler>,
}

impl PushdownDispatcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            registry: Registry::new(name.into(), MIN_PUSHDOWN_ARITY),
        }
    }

    /// Register a handler taking `arity - 2` state components, the stack and
    /// the symbol.
    pub fn register<F>(&mut self, arity: usize, handler: F) -> &mut Self
    where
        F: Fn(&[State], &mut AutomatonStack, Input) -> Step + Send + Sync + 'static,
    {
        self.registry.insert(arity, Box::new(handler));
        self
    }

    pub fn with<F>(mut self, arity: usize, handler: F) -> Self
    where
        F: Fn(&[State], &mut AutomatonStack, Input) -> Step + Send + Sync + 'static,
    {
        self.register(arity, handler);
        self
    }

    /// Register a handler over atomic states (arity 3).
    pub fn on_state<F>(self, handler: F) -> Self
    where
        F: Fn(&State, &mut AutomatonStack, Input) -> Step + Send + Sync + 'static,
    {
        self.with(3, move |args, stack, input| handler(&args[0], stack, input))
    }

    /// Register a handler over two-component tuple states (arity 4).
    pub fn on_pair<F>(self, handler: F) -> Self
    where
        F: Fn(&State, &State, &mut AutomatonStack, Input) -> Step + Send + Sync + 'static,
    {
        self.with(4, move |args, stack, input| {
            handler(&args[0], &args[1], stack, input)
        })
    }

    pub fn name(&self) -> &str {
        &self.registry.name
    }

    pub fn arities(&self) -> Vec<usize> {
        self.registry.arities()
    }

    /// Call the relation; the first handler failure aborts the call.
    pub fn invoke(
        &self,
        state: &State,
        stack: &AutomatonStack,
        input: Input,
    ) -> Result<Vec<(State, AutomatonStack)>, DispatchError> {
        self.combine(state.components(), stack, input, OnFailure::Propagate)
    }

    /// Call the relation; failing handlers (a stack mismatch, typically)
    /// contribute nothing.
    pub fn invoke_lenient(
        &self,
        state: &State,
        stack: &AutomatonStack,
        input: Input,
    ) -> Result<Vec<(State, AutomatonStack)>, DispatchError> {
        self.combine(state.components(), stack, input, OnFailure::Skip)
    }

    fn combine(
        &self,
        args: &[State],
        stack: &AutomatonStack,
        input: Input,
        policy: OnFailure,
    ) -> Result<Vec<(State, AutomatonStack)>, DispatchError> {
        let handlers = self.registry.resolve(args.len() + 2)?;
        let mut results = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let mut private = stack.clone();
            let step = handler(args, &mut private, input);
            if let Some(next) = self.registry.settle(step, policy)? {
                results.push((next, private));
            }
        }
        Ok(results)
    }
}

impl fmt::Debug for PushdownDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PushdownDispatcher")
            .field(&self.registry)
            .finish()
    }
}
