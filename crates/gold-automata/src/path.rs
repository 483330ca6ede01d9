// Witness paths returned by acceptance queries

use std::fmt;

use gold_core::{Input, State};

use crate::stack::AutomatonStack;

/// One configuration on an accepting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub state: State,
    /// Input not yet consumed at this point.
    pub remaining: String,
    /// The move that led here; `None` for the starting configuration.
    pub via: Option<Input>,
    /// Branch stack, for pushdown automata.
    pub stack: Option<AutomatonStack>,
}

/// Accepting run, from the initial configuration to the accepting one.
/// Empty when the tape was empty.
pub type Path = Vec<PathStep>;

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(via) = self.via {
            write!(f, "-{via}-> ")?;
        }
        write!(f, "({}, \"{}\"", self.state, self.remaining)?;
        if let Some(stack) = &self.stack {
            write!(f, ", {stack}")?;
        }
        f.write_str(")")
    }
}
