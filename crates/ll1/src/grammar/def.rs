// reader for the plain production notation
// <def> ::= <production>*           (separated by whitespace)
// <production> ::= <nonterminal> '=' <rhs>
// <rhs> ::= <empty-marker> | <symbol>+
// text after `//` on a line is ignored

use log::trace;

use super::{Grammar, GrammarError, Markers, Production, Symbol};

impl Production {
    /// Parses a single `A=XYZ` entry. `position` is only used for error reporting.
    pub fn parse(entry: &str, position: usize, markers: &Markers) -> Result<Production, GrammarError> {
        let (lhs, rhs) = entry
            .split_once('=')
            .ok_or(GrammarError::MissingSeparator(position))?;

        let mut lhs_chars = lhs.chars();
        let nonterminal = match (lhs_chars.next(), lhs_chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => c,
            _ => return Err(GrammarError::BadLeftHandSide(position, lhs.to_string())),
        };

        let symbols: Vec<Symbol> = rhs.chars().map(|c| markers.classify(c)).collect();
        match symbols.as_slice() {
            [] => Err(GrammarError::EmptyRightHandSide(position)),
            [Symbol::Empty] => Ok(Production::Empty(nonterminal)),
            _ => Ok(Production::Nonempty(nonterminal, symbols)),
        }
    }
}

impl Grammar {
    pub fn from_def(def: &str, markers: Markers) -> Result<Grammar, GrammarError> {
        let entries = def
            .lines()
            .map(|line| line.split_once("//").map_or(line, |(code, _)| code))
            .flat_map(|line| line.split_whitespace());

        let mut productions = Vec::new();
        for (i, entry) in entries.enumerate() {
            trace!("production {}: {}", i + 1, entry);
            productions.push(Production::parse(entry, i + 1, &markers)?);
        }

        Grammar::new(productions, markers)
    }
}
