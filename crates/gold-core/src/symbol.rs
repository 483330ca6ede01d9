// Input symbols, the epsilon marker and alphabets

use std::fmt;

use hashbrown::HashSet;

use crate::error::AutomataError;

/// Display label for epsilon (lambda) moves.
pub const LAMBDA: &str = "λ";

/// What a transition attempts to consume.
///
/// Epsilon is a separate variant rather than a reserved symbol value, so
/// every `char` remains usable in an alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    Symbol(char),
    Epsilon,
}

impl Input {
    /// The consumed symbol, or `None` for an epsilon move.
    #[inline]
    pub fn symbol(self) -> Option<char> {
        match self {
            Input::Symbol(c) => Some(c),
            Input::Epsilon => None,
        }
    }

    #[inline]
    pub fn is_epsilon(self) -> bool {
        matches!(self, Input::Epsilon)
    }

    /// True if this input consumes exactly `symbol`.
    #[inline]
    pub fn is(self, symbol: char) -> bool {
        self == Input::Symbol(symbol)
    }
}

impl From<char> for Input {
    fn from(c: char) -> Self {
        Input::Symbol(c)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Symbol(c) => write!(f, "{c}"),
            Input::Epsilon => f.write_str(LAMBDA),
        }
    }
}

/// The finite set of symbols an automaton consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: HashSet<char>,
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    #[inline]
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in ascending order, for deterministic iteration.
    pub fn sorted(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.symbols.iter().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    /// Split a tape into symbols, rejecting the first one outside the alphabet.
    pub fn read_tape(&self, tape: &str) -> Result<Vec<char>, AutomataError> {
        tape.chars()
            .map(|c| {
                if self.contains(c) {
                    Ok(c)
                } else {
                    Err(AutomataError::SymbolNotInAlphabet(c))
                }
            })
            .collect()
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<&str> for Alphabet {
    /// Every character of the string becomes a symbol.
    fn from(symbols: &str) -> Self {
        Self::new(symbols.chars())
    }
}
