use std::fmt;

use log::{info, warn};

use crate::grammar::Grammar;
use crate::parser::{ConflictPolicy, NullableEntries, ParseRun, ParsingTable, PredictiveParser, TableConflict};

pub mod first;
pub mod follow;

#[cfg(test)]
mod analysis_tests;

pub use first::compute_first_sets;
pub use follow::{compute_follow_sets, FollowGraph, FollowRule, FollowStrategy};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub follow: FollowStrategy,
    pub follow_rule: FollowRule,
    pub conflicts: ConflictPolicy,
    pub nullable_entries: NullableEntries,
}

/// Grammar anomalies. None of these stop the pipeline; the table is built
/// regardless and they are only reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// used on a right-hand side but never defined
    UndefinedNonterminal(char),
    /// FIRST computation reached the nonterminal again through its own productions
    RecursiveFirst(char),
    /// derives no terminal string and not the empty string either
    Unproductive(char),
    TableConflict(TableConflict),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UndefinedNonterminal(c) => write!(f, "nonterminal {} is used but never defined", c),
            Diagnostic::RecursiveFirst(c) => write!(f, "FIRST({}) depends on itself", c),
            Diagnostic::Unproductive(c) => write!(f, "FIRST({}) is empty", c),
            Diagnostic::TableConflict(conflict) => write!(
                f,
                "table conflict at ({}, {:?}): production {} kept, production {} discarded",
                conflict.nonterminal,
                conflict.terminal,
                conflict.kept + 1,
                conflict.discarded + 1
            ),
        }
    }
}

/// The whole pipeline run once over a grammar: FIRST, FOLLOW, then the table.
#[derive(Clone, Debug)]
pub struct Analysis {
    grammar: Grammar,
    table: ParsingTable,
    follow_graph: FollowGraph,
    diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn new(mut grammar: Grammar, config: AnalysisConfig) -> Analysis {
        let mut diagnostics: Vec<Diagnostic> = grammar
            .undefined_nonterminals()
            .into_iter()
            .map(Diagnostic::UndefinedNonterminal)
            .collect();

        diagnostics.extend(compute_first_sets(&mut grammar));
        let follow_graph = compute_follow_sets(&mut grammar, config.follow, config.follow_rule);
        let table = ParsingTable::build(&grammar, config.conflicts, config.nullable_entries);
        diagnostics.extend(table.conflicts().iter().copied().map(Diagnostic::TableConflict));

        for diagnostic in &diagnostics {
            match diagnostic {
                Diagnostic::TableConflict(conflict) => warn!(
                    "table conflict at ({}, {}): kept {}, discarded {}",
                    conflict.nonterminal,
                    grammar.markers().char_of(conflict.terminal),
                    grammar.display_production(conflict.kept),
                    grammar.display_production(conflict.discarded)
                ),
                other => warn!("{}", other),
            }
        }
        info!(
            "analysed {} productions with {} diagnostics",
            grammar.productions().len(),
            diagnostics.len()
        );

        Analysis {
            grammar,
            table,
            follow_graph,
            diagnostics,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn table(&self) -> &ParsingTable {
        &self.table
    }

    pub fn follow_graph(&self) -> &FollowGraph {
        &self.follow_graph
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn parser(&self) -> PredictiveParser<'_> {
        PredictiveParser::new(&self.grammar, &self.table)
    }

    pub fn parse(&self, input: &str) -> ParseRun {
        self.parser().parse(input)
    }
}
