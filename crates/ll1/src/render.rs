// Plain text views over analysis results, laid out in fixed-width columns.

use std::fmt;

use crate::grammar::{Grammar, SymbolSet};
use crate::parser::{Action, ParseRun, ParsingTable};

const TABLE_COLUMN: usize = 10;
const TRACE_COLUMN: usize = 20;

fn write_set(f: &mut fmt::Formatter<'_>, grammar: &Grammar, symbol: char, set: &SymbolSet) -> fmt::Result {
    write!(f, "{}: {{ ", symbol)?;
    for member in set.iter() {
        write!(f, "{} ", grammar.markers().char_of(member))?;
    }
    writeln!(f, "}}")
}

/// `E: { i ( }` per nonterminal, in table order.
pub struct FirstSets<'a>(pub &'a Grammar);

impl fmt::Display for FirstSets<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.0.nonterminals() {
            write_set(f, self.0, record.symbol, &record.first)?;
        }
        Ok(())
    }
}

pub struct FollowSets<'a>(pub &'a Grammar);

impl fmt::Display for FollowSets<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.0.nonterminals() {
            write_set(f, self.0, record.symbol, &record.follow)?;
        }
        Ok(())
    }
}

pub struct TableView<'a> {
    pub grammar: &'a Grammar,
    pub table: &'a ParsingTable,
}

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markers = self.grammar.markers();
        write!(f, "{:<w$}", "", w = TABLE_COLUMN)?;
        for terminal in self.grammar.terminals() {
            write!(f, "{:<w$}", markers.char_of(*terminal), w = TABLE_COLUMN)?;
        }
        writeln!(f)?;

        for (nt, record) in self.grammar.nonterminals().iter().enumerate() {
            write!(f, "{:<w$}", record.symbol, w = TABLE_COLUMN)?;
            for t in 0..self.grammar.terminals().len() {
                let cell = self
                    .table
                    .get(nt, t)
                    .map(|id| self.grammar.display_production(id))
                    .unwrap_or_default();
                write!(f, "{:<w$}", cell, w = TABLE_COLUMN)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct TraceView<'a> {
    pub grammar: &'a Grammar,
    pub run: &'a ParseRun,
}

impl fmt::Display for TraceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<w$}{:<w$}{:<w$}", "Stack", "Input", "Action", w = TRACE_COLUMN)?;
        for step in &self.run.steps {
            write!(f, "{:<w$}{:<w$}", step.stack, step.input, w = TRACE_COLUMN)?;
            match &step.action {
                Action::Match(c) => writeln!(f, "Match '{}'", c)?,
                Action::Apply(id) => writeln!(f, "Apply {}", self.grammar.display_production(*id))?,
                Action::Reject(error) => writeln!(f, "Error: {}", error)?,
            }
        }
        Ok(())
    }
}
