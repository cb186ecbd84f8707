pub mod predictive;
pub mod table;


pub use predictive::{Action, ParseError, ParseRun, PredictiveParser, Step};
pub use table::{ConflictPolicy, NullableEntries, ParsingTable, TableConflict};
