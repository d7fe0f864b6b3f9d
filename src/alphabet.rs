//! An alphabet is a finite set of symbols.
//! Every symbol is a single character, so a word over the alphabet is simply a string whose characters are all members of the alphabet.
//! This module provides the [Alphabet] type and the syntax check for input words.

use std::fmt::Display;

use indexmap::IndexSet;

/// A single input symbol.
pub type Symbol = char;

/// A set of symbols.
/// The symbols are kept in insertion order, which determines the order in which transitions are enumerated, but has no semantic meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: IndexSet<Symbol>,
}

impl Alphabet {
    /// Returns an empty alphabet.
    pub fn empty() -> Self {
        Alphabet::default()
    }

    /// Builds an alphabet from the given symbols.
    /// Returns the first symbol that occurs more than once as an error.
    ///
    /// # Example
    /// ```
    /// use dfa_min::alphabet::Alphabet;
    ///
    /// let alphabet = Alphabet::try_from_symbols(['a', 'b']).unwrap();
    /// assert_eq!(alphabet.len(), 2);
    /// assert_eq!(Alphabet::try_from_symbols(['a', 'b', 'a']), Err('a'));
    /// ```
    pub fn try_from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self, Symbol> {
        let mut alphabet = Alphabet::empty();
        for s in symbols {
            alphabet.insert(s)?;
        }
        Ok(alphabet)
    }

    /// Inserts a symbol into the alphabet.
    /// If the symbol is already present, the alphabet is left unchanged and the symbol is returned in `Err`.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        if self.symbols.insert(symbol) {
            Ok(())
        } else {
            Err(symbol)
        }
    }

    /// Check if the alphabet is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if a symbol is in the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Returns the position of the symbol in insertion order, if it is part of the alphabet.
    pub fn index_of(&self, symbol: Symbol) -> Option<usize> {
        self.symbols.get_index_of(&symbol)
    }

    /// Returns the symbol at the given position in insertion order.
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.symbols.get_index(index).copied()
    }

    /// Return an iterator over all symbols in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    /// Checks whether the input is syntactically a word over this alphabet.
    /// Leading and trailing whitespace is ignored, every other character (including inner whitespace) must be a member of the alphabet.
    /// The empty word is always syntactically valid.
    ///
    /// # Example
    /// ```
    /// use dfa_min::alphabet::Alphabet;
    ///
    /// let alphabet = Alphabet::try_from_symbols(['0', '1']).unwrap();
    /// assert!(alphabet.is_word("  0110 "));
    /// assert!(alphabet.is_word(""));
    /// assert!(!alphabet.is_word("01 10"));
    /// assert!(!alphabet.is_word("012"));
    /// ```
    pub fn is_word(&self, input: &str) -> bool {
        input.trim().chars().all(|c| self.contains(c))
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, s) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "}}")
    }
}
