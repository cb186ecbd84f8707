use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{info, LevelFilter};
use petgraph::dot::{Config, Dot};

use ll1::analysis::{FollowRule, FollowStrategy};
use ll1::parser::{ConflictPolicy, NullableEntries};
use ll1::render::{FirstSets, FollowSets, TableView, TraceView};
use ll1::{Analysis, AnalysisConfig, Grammar, Markers, Production};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FollowArg {
    SinglePass,
    FixedPoint,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConflictArg {
    Overwrite,
    KeepFirst,
}

/// Computes FIRST and FOLLOW sets and an LL(1) table for a grammar, then checks
/// an input string against it.
#[derive(Parser, Debug)]
#[command(name = "ll1", version)]
struct Args {
    /// Grammar file with `A=XYZ` productions separated by whitespace. Without
    /// it the productions are read interactively from stdin.
    grammar: Option<PathBuf>,

    /// Input string to recognize; asked for on stdin when omitted
    #[arg(short, long)]
    input: Option<String>,

    /// How FOLLOW sets are computed: one pass in table order, or until stable
    #[arg(long, value_enum, default_value = "fixed-point")]
    follow: FollowArg,

    /// Let FOLLOW look past nullable symbols instead of stopping at the next one
    #[arg(long)]
    look_past_nullable: bool,

    /// Which production keeps a table cell claimed twice
    #[arg(long, value_enum, default_value = "overwrite")]
    conflicts: ConflictArg,

    /// Also enter nullable productions under FIRST of their right-hand side
    #[arg(long)]
    nullable_first: bool,

    #[arg(long, default_value_t = '#')]
    empty_marker: char,

    #[arg(long, default_value_t = '$')]
    end_marker: char,

    /// Print the FOLLOW dependency graph in Graphviz format
    #[arg(long)]
    dot: bool,

    /// Raise log verbosity, repeat for more (info, debug, trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            follow: match self.follow {
                FollowArg::SinglePass => FollowStrategy::SinglePass,
                FollowArg::FixedPoint => FollowStrategy::FixedPoint,
            },
            follow_rule: if self.look_past_nullable {
                FollowRule::NullableSuffix
            } else {
                FollowRule::NextSymbol
            },
            conflicts: match self.conflicts {
                ConflictArg::Overwrite => ConflictPolicy::Overwrite,
                ConflictArg::KeepFirst => ConflictPolicy::KeepFirst,
            },
            nullable_entries: if self.nullable_first {
                NullableEntries::FirstAndFollow
            } else {
                NullableEntries::FollowOnly
            },
        }
    }

    fn markers(&self) -> Markers {
        Markers {
            empty: self.empty_marker,
            end: self.end_marker,
        }
    }
}

// whitespace separated words from stdin, read a line at a time so prompts
// interleave with typing
struct Words {
    pending: VecDeque<String>,
}

impl Words {
    fn new() -> Words {
        Words {
            pending: VecDeque::new(),
        }
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        if self.pending.is_empty() {
            print!("{}", text);
            io::stdout().flush()?;
        }
        self.word()
    }

    fn word(&mut self) -> Result<String> {
        let stdin = io::stdin();
        while self.pending.is_empty() {
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                bail!("unexpected end of input");
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front().unwrap_or_default())
    }
}

fn read_grammar(words: &mut Words, markers: Markers) -> Result<Grammar> {
    let count: usize = words
        .prompt("Enter number of productions: ")?
        .parse()
        .context("number of productions")?;
    println!(
        "Enter productions (format A=XYZ, use {} for epsilon):",
        markers.empty
    );
    let mut productions = Vec::with_capacity(count);
    for i in 0..count {
        let entry = words.word()?;
        productions.push(Production::parse(&entry, i + 1, &markers)?);
    }
    Ok(Grammar::new(productions, markers)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    let markers = args.markers();
    let mut words = Words::new();
    let grammar = match &args.grammar {
        Some(path) => {
            let def = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            info!("loaded grammar from {}", path.display());
            Grammar::from_def(&def, markers)?
        }
        None => read_grammar(&mut words, markers)?,
    };

    let analysis = Analysis::new(grammar, args.config());
    let grammar = analysis.grammar();

    println!("\nFirst sets:\n{}", FirstSets(grammar));
    println!("Follow sets:\n{}", FollowSets(grammar));
    println!(
        "Parsing Table:\n{}",
        TableView {
            grammar,
            table: analysis.table()
        }
    );

    if args.dot {
        println!(
            "{:?}",
            Dot::with_config(analysis.follow_graph(), &[Config::EdgeNoLabel])
        );
    }

    let input = match args.input.clone() {
        Some(input) => input,
        None => words.prompt("Enter input string: ")?,
    };
    let run = analysis.parse(&input);
    println!("{}", TraceView { grammar, run: &run });

    if run.accepted() {
        println!("Input is valid");
    } else {
        println!("Input is invalid");
    }
    Ok(())
}
