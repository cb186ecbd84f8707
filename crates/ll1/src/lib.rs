pub mod analysis;
pub mod grammar;
pub mod parser;
pub mod render;

pub use analysis::{Analysis, AnalysisConfig, Diagnostic};
pub use grammar::{Grammar, GrammarError, Markers, Production, Symbol};
pub use parser::{ParseError, ParseRun};
