// FIRST sets: memoized recursive descent over the productions of each
// nonterminal, then a saturation sweep if the descent ran into a cycle

use log::{debug, trace};

use crate::grammar::{first_of_sequence, Grammar, Symbol, SymbolSet, NT};

use super::Diagnostic;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Progress {
    NotStarted,
    InProgress,
    Complete,
}

struct FirstEngine<'g> {
    grammar: &'g Grammar,
    sets: Vec<SymbolSet>,
    progress: Vec<Progress>,
    // nonterminals reached again while their own computation was running
    cycles: Vec<NT>,
}

impl<'g> FirstEngine<'g> {
    fn compute(&mut self, nt: NT) {
        match self.progress[nt] {
            Progress::Complete => return,
            Progress::InProgress => {
                if !self.cycles.contains(&nt) {
                    self.cycles.push(nt);
                }
                return;
            }
            Progress::NotStarted => {}
        }
        self.progress[nt] = Progress::InProgress;

        let grammar = self.grammar;
        for (id, production) in grammar.productions_of(nt) {
            let first = self.first_of_rhs(production.rhs());
            trace!("FIRST({}) of {}", grammar.nonterminals[nt].symbol, grammar.display_production(id));
            self.sets[nt].extend_from(&first);
        }

        self.progress[nt] = Progress::Complete;
    }

    // same scan as `first_of_sequence`, but nested nonterminals are computed on demand
    fn first_of_rhs(&mut self, rhs: &[Symbol]) -> SymbolSet {
        let mut result = SymbolSet::new();
        for symbol in rhs {
            match *symbol {
                Symbol::Nonterminal(c) => {
                    let Some(nested) = self.grammar.nonterminal_index(c) else {
                        return result;
                    };
                    self.compute(nested);
                    let nested = &self.sets[nested];
                    result.extend_without_empty(nested);
                    if !nested.contains_empty() {
                        return result;
                    }
                }
                Symbol::Empty => {}
                Symbol::Terminal(_) | Symbol::EOF => {
                    result.insert(*symbol);
                    return result;
                }
            }
        }
        result.insert(Symbol::Empty);
        result
    }

    // A cycle means some nonterminal read a partial set; sweep every production
    // until nothing changes so all sets reach their fixed point.
    fn saturate(&mut self) {
        let grammar = self.grammar;
        let mut rounds = 0;
        loop {
            let mut changed = false;
            for production in grammar.productions() {
                let Some(nt) = grammar.nonterminal_index(production.nonterminal()) else {
                    continue;
                };
                let sets = &self.sets;
                let first = first_of_sequence(production.rhs(), |c| {
                    grammar.nonterminal_index(c).map(|n| &sets[n])
                });
                changed |= self.sets[nt].extend_from(&first);
            }
            rounds += 1;
            if !changed {
                break;
            }
        }
        debug!("FIRST sets saturated after {} rounds", rounds);
    }
}

/// Computes the FIRST set of every nonterminal and stores it on the grammar.
pub fn compute_first_sets(grammar: &mut Grammar) -> Vec<Diagnostic> {
    let n = grammar.nonterminals.len();
    let mut engine = FirstEngine {
        grammar: &*grammar,
        sets: vec![SymbolSet::new(); n],
        progress: vec![Progress::NotStarted; n],
        cycles: Vec::new(),
    };

    for nt in 0..n {
        engine.compute(nt);
    }
    if !engine.cycles.is_empty() {
        engine.saturate();
    }

    let FirstEngine { sets, cycles, .. } = engine;

    let mut diagnostics: Vec<Diagnostic> = cycles
        .into_iter()
        .map(|nt| Diagnostic::RecursiveFirst(grammar.nonterminals[nt].symbol))
        .collect();
    for (record, first) in grammar.nonterminals.iter_mut().zip(sets) {
        if first.is_empty() {
            diagnostics.push(Diagnostic::Unproductive(record.symbol));
        }
        record.first = first;
    }

    diagnostics
}
