use log::debug;

use crate::grammar::{Grammar, ProductionId, Symbol, Term, NT};

/// What happens when two productions claim the same cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// the later production replaces the earlier one
    #[default]
    Overwrite,
    KeepFirst,
}

/// Cells a production that can derive empty is installed under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullableEntries {
    /// only FOLLOW(lhs)
    #[default]
    FollowOnly,
    /// FIRST(rhs) as well as FOLLOW(lhs)
    FirstAndFollow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConflict {
    pub nonterminal: char,
    pub terminal: Symbol,
    pub kept: ProductionId,
    pub discarded: ProductionId,
}

/// Predictive parsing table, one row per nonterminal and one column per
/// terminal (end marker included), laid out row-major.
#[derive(Clone, Debug)]
pub struct ParsingTable {
    n_nonterminals: usize,
    n_terminals: usize,
    cells: Vec<Option<ProductionId>>,
    conflicts: Vec<TableConflict>,
}

impl ParsingTable {
    /// Builds the table from the FIRST and FOLLOW sets recorded on the grammar.
    pub fn build(grammar: &Grammar, policy: ConflictPolicy, nullable: NullableEntries) -> ParsingTable {
        let n_nonterminals = grammar.nonterminals().len();
        let n_terminals = grammar.terminals().len();
        let mut table = ParsingTable {
            n_nonterminals,
            n_terminals,
            cells: vec![None; n_nonterminals * n_terminals],
            conflicts: Vec::new(),
        };

        for (id, production) in grammar.productions().iter().enumerate() {
            let Some(lhs) = grammar.nonterminal_index(production.nonterminal()) else {
                continue;
            };
            let first = grammar.first_of_sequence(production.rhs());

            let mut lookaheads: Vec<Symbol> = Vec::new();
            if !first.contains_empty() || nullable == NullableEntries::FirstAndFollow {
                lookaheads.extend(first.iter().filter(|s| *s != Symbol::Empty));
            }
            if first.contains_empty() {
                lookaheads.extend(grammar.nonterminals()[lhs].follow.iter());
            }

            for lookahead in lookaheads {
                // terminals outside the table are skipped
                if let Some(t) = grammar.terminal_index(lookahead) {
                    table.install(grammar, lhs, t, id, policy);
                }
            }
        }

        debug!(
            "parsing table {}x{} with {} conflicts",
            n_nonterminals,
            n_terminals,
            table.conflicts.len()
        );
        table
    }

    fn install(&mut self, grammar: &Grammar, nt: NT, t: Term, id: ProductionId, policy: ConflictPolicy) {
        let cell = &mut self.cells[nt * self.n_terminals + t];
        let existing = match *cell {
            None => {
                *cell = Some(id);
                return;
            }
            Some(existing) if existing == id => return,
            Some(existing) => existing,
        };

        let (kept, discarded) = match policy {
            ConflictPolicy::Overwrite => {
                *cell = Some(id);
                (id, existing)
            }
            ConflictPolicy::KeepFirst => (existing, id),
        };
        let conflict = TableConflict {
            nonterminal: grammar.nonterminals()[nt].symbol,
            terminal: grammar.terminals()[t],
            kept,
            discarded,
        };
        debug!(
            "conflict in cell ({}, {}): keeping {}, discarding {}",
            conflict.nonterminal,
            grammar.markers().char_of(conflict.terminal),
            grammar.display_production(kept),
            grammar.display_production(discarded)
        );
        self.conflicts.push(conflict);
    }

    pub fn get(&self, nt: NT, t: Term) -> Option<ProductionId> {
        if nt >= self.n_nonterminals || t >= self.n_terminals {
            return None;
        }
        self.cells[nt * self.n_terminals + t]
    }

    /// Cell lookup by symbol rather than table index.
    pub fn entry(&self, grammar: &Grammar, nonterminal: char, terminal: Symbol) -> Option<ProductionId> {
        let nt = grammar.nonterminal_index(nonterminal)?;
        let t = grammar.terminal_index(terminal)?;
        self.get(nt, t)
    }

    /// Every cell that was claimed twice, in the order the clashes happened.
    pub fn conflicts(&self) -> &[TableConflict] {
        &self.conflicts
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.n_nonterminals, self.n_terminals)
    }
}
