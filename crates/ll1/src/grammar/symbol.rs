/// Characters reserved by the production notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Markers {
    /// written as the whole right-hand side of a production deriving nothing
    pub empty: char,
    /// appended to every input and placed at the bottom of the parse stack
    pub end: char,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            empty: '#',
            end: '$',
        }
    }
}

impl Markers {
    pub fn is_valid(&self) -> bool {
        let usable = |c: char| !c.is_whitespace() && !c.is_ascii_uppercase() && c != '=';
        self.empty != self.end && usable(self.empty) && usable(self.end)
    }

    /// Structural classification: upper-case letters are nonterminals, the two
    /// markers are themselves, everything else is a terminal.
    pub fn classify(&self, c: char) -> Symbol {
        if c.is_ascii_uppercase() {
            Symbol::Nonterminal(c)
        } else if c == self.empty {
            Symbol::Empty
        } else if c == self.end {
            Symbol::EOF
        } else {
            Symbol::Terminal(c)
        }
    }

    pub fn char_of(&self, symbol: Symbol) -> char {
        match symbol {
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => c,
            Symbol::Empty => self.empty,
            Symbol::EOF => self.end,
        }
    }

    pub fn render(&self, symbols: &[Symbol]) -> String {
        symbols.iter().map(|s| self.char_of(*s)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
    Empty,
    EOF,
}

impl Symbol {
    pub fn is_terminal(self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    // dense key for bit sets; markers take the two lowest slots
    pub(crate) fn key(self) -> usize {
        match self {
            Symbol::Empty => 0,
            Symbol::EOF => 1,
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => c as usize + 2,
        }
    }
}
