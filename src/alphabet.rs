//! Symbol interning and derivation storage.
//!
//! A [`Derivation`] is a flat [`SymbiosState`] of parameterless symbols together with the
//! [`Alphabet`] that maps symbol IDs back to the characters they were parsed from.

use crate::error::{FloraError, Result};
use std::fmt;
use symbios::{SymbiosState, SymbolTable};

/// Characters with a meaning to the grammar or the turtle.
pub const STANDARD_SYMBOLS: &str = "FXYL123456[]";

/// Bidirectional mapping between characters and [`SymbolTable`] IDs.
///
/// Any character can be interned. Those outside [`STANDARD_SYMBOLS`] are carried through
/// rewriting and ignored by the interpreter.
pub struct Alphabet {
    table: SymbolTable,
    chars: Vec<Option<char>>,
}

impl Alphabet {
    /// Creates an alphabet with every standard symbol already interned.
    pub fn new() -> Result<Self> {
        let mut alphabet = Self {
            table: SymbolTable::new(),
            chars: Vec::new(),
        };
        for c in STANDARD_SYMBOLS.chars() {
            alphabet.intern(c)?;
        }
        Ok(alphabet)
    }

    /// Returns the ID of `c`, interning it first if it has not been seen yet.
    pub fn intern(&mut self, c: char) -> Result<u16> {
        let mut buf = [0u8; 4];
        let name: &str = c.encode_utf8(&mut buf);

        let id = match self.table.resolve_id(name) {
            Some(id) => id,
            None => self.table.intern(name).map_err(FloraError::Symbols)?,
        };

        let idx = id as usize;
        if idx >= self.chars.len() {
            self.chars.resize(idx + 1, None);
        }
        self.chars[idx] = Some(c);
        Ok(id)
    }

    /// Looks up the ID of an already interned character.
    pub fn id_of(&self, c: char) -> Option<u16> {
        let mut buf = [0u8; 4];
        self.table.resolve_id(c.encode_utf8(&mut buf))
    }

    /// Like [`id_of`](Self::id_of), but a missing symbol is an error.
    pub(crate) fn require(&self, c: char) -> Result<u16> {
        self.id_of(c)
            .ok_or_else(|| FloraError::Symbols(format!("symbol '{c}' is not interned")))
    }

    /// Reverse lookup of a symbol ID.
    pub fn char_of(&self, id: u16) -> Option<char> {
        self.chars.get(id as usize).copied().flatten()
    }

    /// The underlying symbios table, for registering interpreter operations.
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }
}

/// An ordered sequence of symbols produced by parsing an axiom or by rewriting.
///
/// Derivations are only ever replaced wholesale by a rewriting pass, never edited in place.
pub struct Derivation {
    state: SymbiosState,
    alphabet: Alphabet,
}

impl Derivation {
    /// Parses `text` one character per symbol. Unknown characters are kept as inert symbols.
    pub fn parse(text: &str) -> Result<Self> {
        let mut derivation = Self::empty(Alphabet::new()?);
        for c in text.chars() {
            let id = derivation.alphabet.intern(c)?;
            derivation.push_id(id)?;
        }
        Ok(derivation)
    }

    pub(crate) fn empty(alphabet: Alphabet) -> Self {
        Self {
            state: SymbiosState::new(),
            alphabet,
        }
    }

    pub(crate) fn push_id(&mut self, id: u16) -> Result<()> {
        push_symbol(&mut self.state, id)
    }

    /// Swaps in the output of a rewriting pass.
    pub(crate) fn replace_state(&mut self, state: SymbiosState) {
        self.state = state;
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The symbios state holding the symbol IDs.
    pub fn state(&self) -> &SymbiosState {
        &self.state
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Iterates over the symbol IDs in order.
    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.state.len()).map_while(|i| self.state.get_view(i).map(|view| view.sym))
    }

    /// Iterates over the symbols as characters.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.ids()
            .map(|id| self.alphabet.char_of(id).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// True when every `]` closes an earlier `[` and nothing is left open.
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0usize;
        for c in self.symbols() {
            match c {
                '[' => depth += 1,
                ']' => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                _ => {}
            }
        }
        depth == 0
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.symbols() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derivation").field(&self.to_string()).finish()
    }
}

/// Appends a parameterless, age-zero symbol to `state`.
pub(crate) fn push_symbol(state: &mut SymbiosState, id: u16) -> Result<()> {
    state
        .push(id, 0.0, &[])
        .map_err(|e| FloraError::Symbols(e.to_string()))
}
