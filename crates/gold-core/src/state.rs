// Automaton state values and state sets

use std::fmt;

use hashbrown::HashSet;

/// An automaton state.
///
/// States are opaque to the engine: it only hashes, compares and displays
/// them. The one structural distinction it cares about is between atomic
/// states and [`State::Tuple`], whose components are passed to transition
/// handlers as separate positional parameters.
///
/// The same representation is used for stack symbols in pushdown automata,
/// so handlers can push integers, names or tuples alike.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Integer-labelled state.
    Int(i64),
    /// Named state (`"q0"`, `"accept"`, ...).
    Name(String),
    /// Compound state, exploded into its components on dispatch.
    Tuple(Vec<State>),
}

/// Stack symbols share the state representation.
pub type StackSymbol = State;

/// Set of states, as declared on an automaton.
pub type StateSet = HashSet<State>;

impl State {
    /// Build a tuple state from its components.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<State>,
    {
        State::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// The integer label, if this is an [`State::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            State::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The name, if this is a [`State::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            State::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, State::Tuple(_))
    }

    /// Positional parameters this state contributes to a handler call.
    ///
    /// A tuple explodes into its components (one level deep); any other
    /// state is passed as a single parameter.
    pub fn components(&self) -> &[State] {
        match self {
            State::Tuple(items) => items,
            atom => std::slice::from_ref(atom),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Int(n) => write!(f, "{n}"),
            State::Name(name) => f.write_str(name),
            State::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<i64> for State {
    fn from(n: i64) -> Self {
        State::Int(n)
    }
}

impl From<i32> for State {
    fn from(n: i32) -> Self {
        State::Int(n as i64)
    }
}

/// Indices above `i64::MAX` saturate.
impl From<usize> for State {
    fn from(n: usize) -> Self {
        State::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        State::Name(name.to_string())
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        State::Name(name)
    }
}

impl From<Vec<State>> for State {
    fn from(items: Vec<State>) -> Self {
        State::Tuple(items)
    }
}

impl<A, B> From<(A, B)> for State
where
    A: Into<State>,
    B: Into<State>,
{
    fn from((a, b): (A, B)) -> Self {
        State::Tuple(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for State
where
    A: Into<State>,
    B: Into<State>,
    C: Into<State>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        State::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

/// Collect anything state-like into a [`StateSet`].
pub fn state_set<I, T>(states: I) -> StateSet
where
    I: IntoIterator<Item = T>,
    T: Into<State>,
{
    states.into_iter().map(Into::into).collect()
}
