use bit_set::BitSet;

use super::symbol::Symbol;

/// Set of grammar symbols. Membership is order independent, iteration follows
/// insertion order so sets print the way they were discovered.
#[derive(Clone, Debug, Default)]
pub struct SymbolSet {
    data: BitSet,
    order: Vec<Symbol>,
}

impl SymbolSet {
    pub fn new() -> SymbolSet {
        SymbolSet {
            data: BitSet::new(),
            order: Vec::new(),
        }
    }

    /// Returns true if the symbol was not already present.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if self.data.insert(symbol.key()) {
            self.order.push(symbol);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.data.contains(symbol.key())
    }

    pub fn contains_empty(&self) -> bool {
        self.contains(Symbol::Empty)
    }

    pub fn contains_eof(&self) -> bool {
        self.contains(Symbol::EOF)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.order.iter().copied()
    }

    /// Adds every member of `other`, returns whether anything was added.
    pub fn extend_from(&mut self, other: &SymbolSet) -> bool {
        let mut changed = false;
        for symbol in other.iter() {
            changed |= self.insert(symbol);
        }
        changed
    }

    /// Same as `extend_from` but leaves out the empty-derivation marker.
    pub fn extend_without_empty(&mut self, other: &SymbolSet) -> bool {
        let mut changed = false;
        for symbol in other.iter().filter(|s| *s != Symbol::Empty) {
            changed |= self.insert(symbol);
        }
        changed
    }
}

impl PartialEq for SymbolSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|s| other.contains(s))
    }
}

impl Eq for SymbolSet {}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut set = SymbolSet::new();
        for symbol in iter {
            set.insert(symbol);
        }
        set
    }
}
