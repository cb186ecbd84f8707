use std::collections::HashMap;

use log::debug;
use thiserror::Error;

mod def;
mod sets;
mod symbol;


pub use sets::SymbolSet;
pub use symbol::{Markers, Symbol};

/// Index into the nonterminal table.
pub type NT = usize;
/// Index into the terminal table (the end marker is the last column).
pub type Term = usize;
/// Declaration position of a production.
pub type ProductionId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Production {
    Empty(char),
    Nonempty(char, Vec<Symbol>),
}

impl Production {
    pub fn nonterminal(&self) -> char {
        match self {
            Production::Empty(nt) => *nt,
            Production::Nonempty(nt, _) => *nt,
        }
    }

    /// Right-hand side symbols; an empty production has none.
    pub fn rhs(&self) -> &[Symbol] {
        match self {
            Production::Empty(_) => &[],
            Production::Nonempty(_, rhs) => rhs,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Nonterminal {
    pub symbol: char,
    pub first: SymbolSet,
    pub follow: SymbolSet,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    NoProductions,
    #[error("empty and end markers must differ and cannot be whitespace, `=` or upper-case letters")]
    InvalidMarkers,
    #[error("production {0}: missing `=` separator")]
    MissingSeparator(usize),
    #[error("production {0}: left-hand side must be a single nonterminal, found `{1}`")]
    BadLeftHandSide(usize, String),
    #[error("production {0}: right-hand side is empty")]
    EmptyRightHandSide(usize),
    #[error("production {0}: empty marker `{1}` must be the whole right-hand side")]
    MisplacedEmptyMarker(usize, char),
    #[error("production {0}: end marker `{1}` cannot appear in a production")]
    ReservedEndMarker(usize, char),
    #[error("production {0}: `{1}` is not classified as {2}")]
    MisclassifiedSymbol(usize, char, &'static str),
}

/// Productions in declaration order plus the tables derived from them. The start
/// symbol is the left-hand side of the first production.
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) productions: Vec<Production>,
    pub(crate) nonterminals: Vec<Nonterminal>,
    pub(crate) terminals: Vec<Symbol>,
    // productions of each nonterminal, in declaration order
    pub(crate) rules: Vec<Vec<ProductionId>>,
    nonterminal_index: HashMap<char, NT>,
    terminal_index: HashMap<Symbol, Term>,
    markers: Markers,
}

impl Grammar {
    pub fn new(productions: Vec<Production>, markers: Markers) -> Result<Grammar, GrammarError> {
        if !markers.is_valid() {
            return Err(GrammarError::InvalidMarkers);
        }
        if productions.is_empty() {
            return Err(GrammarError::NoProductions);
        }
        for (i, production) in productions.iter().enumerate() {
            Self::check_production(i + 1, production, &markers)?;
        }

        let mut nonterminals: Vec<Nonterminal> = Vec::new();
        let mut nonterminal_index: HashMap<char, NT> = HashMap::new();
        let mut rules: Vec<Vec<ProductionId>> = Vec::new();
        let mut terminals: Vec<Symbol> = Vec::new();
        let mut terminal_index: HashMap<Symbol, Term> = HashMap::new();

        for (id, production) in productions.iter().enumerate() {
            let lhs = production.nonterminal();
            let nt = *nonterminal_index.entry(lhs).or_insert_with(|| {
                nonterminals.push(Nonterminal {
                    symbol: lhs,
                    first: SymbolSet::new(),
                    follow: SymbolSet::new(),
                });
                rules.push(Vec::new());
                nonterminals.len() - 1
            });
            rules[nt].push(id);

            for symbol in production.rhs().iter().copied().filter(|s| s.is_terminal()) {
                terminal_index.entry(symbol).or_insert_with(|| {
                    terminals.push(symbol);
                    terminals.len() - 1
                });
            }
        }
        terminal_index.insert(Symbol::EOF, terminals.len());
        terminals.push(Symbol::EOF);

        debug!(
            "grammar with {} productions, {} nonterminals, {} terminals",
            productions.len(),
            nonterminals.len(),
            terminals.len()
        );

        Ok(Grammar {
            productions,
            nonterminals,
            terminals,
            rules,
            nonterminal_index,
            terminal_index,
            markers,
        })
    }

    fn check_production(
        position: usize,
        production: &Production,
        markers: &Markers,
    ) -> Result<(), GrammarError> {
        let lhs = production.nonterminal();
        if !lhs.is_ascii_uppercase() {
            return Err(GrammarError::BadLeftHandSide(position, lhs.to_string()));
        }
        if let Production::Nonempty(_, rhs) = production {
            if rhs.is_empty() {
                return Err(GrammarError::EmptyRightHandSide(position));
            }
        }
        for symbol in production.rhs() {
            match *symbol {
                Symbol::Empty => {
                    return Err(GrammarError::MisplacedEmptyMarker(position, markers.empty))
                }
                Symbol::EOF => return Err(GrammarError::ReservedEndMarker(position, markers.end)),
                Symbol::Terminal(c) if markers.classify(c) != *symbol => {
                    return Err(GrammarError::MisclassifiedSymbol(position, c, "a terminal"))
                }
                Symbol::Nonterminal(c) if markers.classify(c) != *symbol => {
                    return Err(GrammarError::MisclassifiedSymbol(position, c, "a nonterminal"))
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn start_symbol(&self) -> char {
        self.productions[0].nonterminal()
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn nonterminals(&self) -> &[Nonterminal] {
        &self.nonterminals
    }

    /// Terminals in first-seen order, end marker last.
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn nonterminal_index(&self, symbol: char) -> Option<NT> {
        self.nonterminal_index.get(&symbol).copied()
    }

    pub fn terminal_index(&self, symbol: Symbol) -> Option<Term> {
        self.terminal_index.get(&symbol).copied()
    }

    pub fn productions_of(&self, nt: NT) -> impl Iterator<Item = (ProductionId, &Production)> + '_ {
        self.rules[nt].iter().map(|id| (*id, &self.productions[*id]))
    }

    pub fn first(&self, symbol: char) -> Option<&SymbolSet> {
        self.nonterminal_index(symbol)
            .map(|nt| &self.nonterminals[nt].first)
    }

    pub fn follow(&self, symbol: char) -> Option<&SymbolSet> {
        self.nonterminal_index(symbol)
            .map(|nt| &self.nonterminals[nt].follow)
    }

    /// Nonterminals used on some right-hand side without a production of their own.
    pub fn undefined_nonterminals(&self) -> Vec<char> {
        let mut undefined = Vec::new();
        for production in &self.productions {
            for symbol in production.rhs() {
                if let Symbol::Nonterminal(c) = *symbol {
                    if self.nonterminal_index(c).is_none() && !undefined.contains(&c) {
                        undefined.push(c);
                    }
                }
            }
        }
        undefined
    }

    /// FIRST of a symbol sequence from the FIRST sets currently recorded. The
    /// empty marker is included when every symbol can derive empty, which makes
    /// an empty sequence yield just the marker.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> SymbolSet {
        first_of_sequence(symbols, |c| {
            self.nonterminal_index(c).map(|nt| &self.nonterminals[nt].first)
        })
    }

    pub fn display_production(&self, id: ProductionId) -> String {
        let production = &self.productions[id];
        let rhs = match production {
            Production::Empty(_) => self.markers.empty.to_string(),
            Production::Nonempty(_, rhs) => self.markers.render(rhs),
        };
        format!("{}={}", production.nonterminal(), rhs)
    }
}

/// Left-to-right FIRST scan shared by the FIRST engine and the table builder.
/// Terminals stop the scan; a nonterminal contributes its set minus empty and
/// only lets the scan continue if it is nullable. Unknown nonterminals have an
/// empty, non-nullable set.
pub(crate) fn first_of_sequence<'a>(
    symbols: &[Symbol],
    first_of: impl Fn(char) -> Option<&'a SymbolSet>,
) -> SymbolSet {
    let mut result = SymbolSet::new();
    for symbol in symbols {
        match *symbol {
            Symbol::Terminal(_) => {
                result.insert(*symbol);
                return result;
            }
            Symbol::Nonterminal(c) => match first_of(c) {
                Some(nested) => {
                    result.extend_without_empty(nested);
                    if !nested.contains_empty() {
                        return result;
                    }
                }
                None => return result,
            },
            Symbol::Empty => {}
            Symbol::EOF => {
                result.insert(Symbol::EOF);
                return result;
            }
        }
    }
    result.insert(Symbol::Empty);
    result
}
