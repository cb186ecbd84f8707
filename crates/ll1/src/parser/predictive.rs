use std::iter;

use log::{debug, trace};
use thiserror::Error;

use crate::grammar::{Grammar, ProductionId, Symbol};

use super::table::ParsingTable;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected symbol '{0}' on stack")]
    UnexpectedSymbol(char),
    #[error("Invalid terminal '{0}'")]
    InvalidLookahead(char),
    #[error("No production for {nonterminal} on '{lookahead}'")]
    NoProduction { nonterminal: char, lookahead: char },
    #[error("Nonterminal {0} expands to itself without consuming input")]
    LeftRecursion(char),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Match(char),
    Apply(ProductionId),
    Reject(ParseError),
}

/// Parser state before `action` was taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// bottom of the stack first
    pub stack: String,
    /// unconsumed input, end marker included
    pub input: String,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseRun {
    pub steps: Vec<Step>,
    pub verdict: Result<(), ParseError>,
}

impl ParseRun {
    pub fn accepted(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Table driven recognizer. Holds no state between runs; every call to
/// `parse` starts from a fresh stack.
pub struct PredictiveParser<'a> {
    grammar: &'a Grammar,
    table: &'a ParsingTable,
}

impl<'a> PredictiveParser<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a ParsingTable) -> PredictiveParser<'a> {
        PredictiveParser { grammar, table }
    }

    /// Every input character is read as a terminal, so nonterminal letters and
    /// marker characters in the input are invalid lookaheads.
    pub fn parse(&self, input: &str) -> ParseRun {
        let input: Vec<Symbol> = input
            .chars()
            .map(Symbol::Terminal)
            .chain(iter::once(Symbol::EOF))
            .collect();
        let markers = self.grammar.markers();

        let mut stack = vec![Symbol::EOF, Symbol::Nonterminal(self.grammar.start_symbol())];
        let mut cursor = 0;
        let mut steps = Vec::new();
        // nonterminals expanded since the last match, each with the stack slot
        // it occupied; an entry dies with its slot
        let mut expanded: Vec<(char, usize)> = Vec::new();

        while let Some(&top) = stack.last() {
            expanded.retain(|&(_, slot)| slot < stack.len());
            let look = input.get(cursor).copied().unwrap_or(Symbol::EOF);
            let mut step = Step {
                stack: markers.render(&stack),
                input: markers.render(&input[cursor.min(input.len())..]),
                action: Action::Match(markers.char_of(top)),
            };

            if top == look {
                trace!("{:<20}{:<20}match", step.stack, step.input);
                steps.push(step);
                stack.pop();
                cursor += 1;
                expanded.clear();
                continue;
            }

            let prediction = self.predict(top, look).and_then(|id| match top {
                // the same expansion would repeat forever
                Symbol::Nonterminal(c) if expanded.iter().any(|&(seen, _)| seen == c) => {
                    Err(ParseError::LeftRecursion(c))
                }
                _ => Ok(id),
            });

            match prediction {
                Ok(id) => {
                    trace!("{:<20}{:<20}apply {}", step.stack, step.input, self.grammar.display_production(id));
                    step.action = Action::Apply(id);
                    steps.push(step);
                    stack.pop();
                    if let Symbol::Nonterminal(c) = top {
                        expanded.push((c, stack.len()));
                    }
                    stack.extend(self.grammar.productions()[id].rhs().iter().rev());
                }
                Err(error) => {
                    debug!("rejected: {}", error);
                    step.action = Action::Reject(error);
                    steps.push(step);
                    return ParseRun {
                        steps,
                        verdict: Err(error),
                    };
                }
            }
        }

        debug!("accepted after {} steps", steps.len());
        ParseRun {
            steps,
            verdict: Ok(()),
        }
    }

    fn predict(&self, top: Symbol, look: Symbol) -> Result<ProductionId, ParseError> {
        let markers = self.grammar.markers();
        let nonterminal = match top {
            Symbol::Nonterminal(c) => self.grammar.nonterminal_index(c).map(|nt| (c, nt)),
            _ => None,
        };
        let (nonterminal, nt) =
            nonterminal.ok_or(ParseError::UnexpectedSymbol(markers.char_of(top)))?;
        let t = self
            .grammar
            .terminal_index(look)
            .ok_or(ParseError::InvalidLookahead(markers.char_of(look)))?;

        self.table.get(nt, t).ok_or(ParseError::NoProduction {
            nonterminal,
            lookahead: markers.char_of(look),
        })
    }
}
