// LIFO stack threaded through pushdown branches

use std::fmt;

use gold_core::{StackError, StackSymbol};

/// Stack of a pushdown automaton branch.
///
/// `pop` and `peek` take the symbols the caller expects to find, in the
/// order they are removed (topmost first). A pop fails on the first symbol
/// that differs, with the symbols before it already consumed; callers treat
/// any failure as fatal to the transition that attempted it.
///
/// `Clone` is a full value copy: no storage is shared between a stack and
/// its clones, so sibling branches never see each other's pushes and pops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AutomatonStack {
    items: Vec<StackSymbol>,
}

impl AutomatonStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push symbols in argument order; the last one ends up on top.
    pub fn push<I, T>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<StackSymbol>,
    {
        self.items.extend(symbols.into_iter().map(Into::into));
    }

    /// Pop one symbol per expected symbol, checking each against the top.
    pub fn pop<I, T>(&mut self, expected: I) -> Result<(), StackError>
    where
        I: IntoIterator<Item = T>,
        T: Into<StackSymbol>,
    {
        for symbol in expected {
            let expected = symbol.into();
            match self.items.pop() {
                Some(found) if found == expected => {}
                Some(found) => return Err(StackError::Mismatch { expected, found }),
                None => return Err(StackError::Underflow { expected }),
            }
        }
        Ok(())
    }

    /// Check, without consuming, whether the topmost symbols are `expected`
    /// (topmost first).
    pub fn peek<I, T>(&self, expected: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<StackSymbol>,
    {
        let mut from_top = self.items.iter().rev();
        expected
            .into_iter()
            .all(|symbol| from_top.next() == Some(&symbol.into()))
    }

    pub fn top(&self) -> Option<&StackSymbol> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Symbols bottom to top.
    pub fn as_slice(&self) -> &[StackSymbol] {
        &self.items
    }
}

impl fmt::Display for AutomatonStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}
