use crate::grammar::{Grammar, Markers, SymbolSet};
use crate::parser::{ConflictPolicy, TableConflict};
use crate::Symbol;

use super::{
    compute_first_sets, compute_follow_sets, Analysis, AnalysisConfig, Diagnostic, FollowRule, FollowStrategy,
};

fn grammar(def: &str) -> Grammar {
    Grammar::from_def(def, Markers::default()).expect("grammar should be well formed")
}

fn set(members: &str) -> SymbolSet {
    let markers = Markers::default();
    members.chars().map(|c| markers.classify(c)).collect()
}

fn assert_sets(grammar: &Grammar, expected: &[(char, &str, &str)]) {
    for (nt, first, follow) in expected {
        assert_eq!(grammar.first(*nt), Some(&set(first)), "FIRST({})", nt);
        assert_eq!(grammar.follow(*nt), Some(&set(follow)), "FOLLOW({})", nt);
    }
}

#[test]
fn expression_sets() {
    let analysis = Analysis::new(
        grammar(include_str!("../grammars/expression.def")),
        AnalysisConfig::default(),
    );
    assert_sets(
        analysis.grammar(),
        &[('E', "i", "$"), ('X', "+#", "$"), ('T', "i", "+$")],
    );
    assert!(analysis.diagnostics().is_empty());
}

#[test]
fn arithmetic_sets() {
    let analysis = Analysis::new(
        grammar(include_str!("../grammars/arithmetic.def")),
        AnalysisConfig::default(),
    );
    assert_sets(
        analysis.grammar(),
        &[
            ('E', "(i", "$)"),
            ('R', "+#", "$)"),
            ('T', "(i", "+$)"),
            ('Y', "*#", "+$)"),
            ('F', "(i", "*+$)"),
        ],
    );
}

#[test]
fn first_sets_print_in_discovery_order() {
    let mut g = grammar(include_str!("../grammars/arithmetic.def"));
    compute_first_sets(&mut g);
    let order: Vec<Symbol> = g.first('E').unwrap().iter().collect();
    assert_eq!(order, vec![Symbol::Terminal('('), Symbol::Terminal('i')]);
    let order: Vec<Symbol> = g.first('R').unwrap().iter().collect();
    assert_eq!(order, vec![Symbol::Terminal('+'), Symbol::Empty]);
}

#[test]
fn empty_marker_only_when_rhs_can_vanish() {
    let mut g = grammar("S=AB C=Ad A=a A=# B=b B=#");
    compute_first_sets(&mut g);
    assert_eq!(g.first('S'), Some(&set("ab#")));
    assert_eq!(g.first('C'), Some(&set("ad")));
    assert_eq!(g.first('A'), Some(&set("a#")));
}

#[test]
fn left_recursion_is_reported_and_still_seeded() {
    let mut g = grammar("E=E+T E=T T=i");
    let diagnostics = compute_first_sets(&mut g);
    assert_eq!(g.first('E'), Some(&set("i")));
    assert_eq!(diagnostics, vec![Diagnostic::RecursiveFirst('E')]);
}

#[test]
fn indirect_cycle_reaches_fixed_point() {
    // B reads the partial FIRST(A) during the descent; the sweep has to fix it
    let mut g = grammar("A=Ba A=c B=Ab B=#");
    let diagnostics = compute_first_sets(&mut g);
    assert_eq!(g.first('A'), Some(&set("ac")));
    assert_eq!(g.first('B'), Some(&set("#ac")));
    assert!(diagnostics.contains(&Diagnostic::RecursiveFirst('A')));
}

#[test]
fn unproductive_nonterminal() {
    let mut g = grammar("S=aA A=A");
    let diagnostics = compute_first_sets(&mut g);
    assert_eq!(g.first('A'), Some(&SymbolSet::new()));
    assert_eq!(
        diagnostics,
        vec![Diagnostic::RecursiveFirst('A'), Diagnostic::Unproductive('A')]
    );
}

#[test]
fn undefined_nonterminal_has_no_first() {
    let analysis = Analysis::new(
        grammar(include_str!("../grammars/undefined.def")),
        AnalysisConfig::default(),
    );
    assert_eq!(analysis.grammar().first('S'), Some(&set("ab")));
    assert_eq!(analysis.grammar().first('Y'), None);
    assert_eq!(
        analysis.diagnostics(),
        &[Diagnostic::UndefinedNonterminal('Y')]
    );
}

#[test]
fn start_symbol_follows_with_end_marker() {
    for def in [
        include_str!("../grammars/expression.def"),
        include_str!("../grammars/arithmetic.def"),
        include_str!("../grammars/nullable.def"),
        include_str!("../grammars/forward.def"),
    ] {
        for follow in [FollowStrategy::SinglePass, FollowStrategy::FixedPoint] {
            let mut g = grammar(def);
            compute_first_sets(&mut g);
            compute_follow_sets(&mut g, follow, FollowRule::NextSymbol);
            let start = g.start_symbol();
            assert!(g.follow(start).unwrap().contains_eof());
        }
    }
}

#[test]
fn single_pass_misses_forward_dependencies() {
    let def = include_str!("../grammars/forward.def");

    let mut literal = grammar(def);
    compute_first_sets(&mut literal);
    compute_follow_sets(&mut literal, FollowStrategy::SinglePass, FollowRule::NextSymbol);
    assert_eq!(literal.follow('A'), Some(&set("x")));
    assert_eq!(literal.follow('B'), Some(&SymbolSet::new()));

    let mut fixed = grammar(def);
    compute_first_sets(&mut fixed);
    compute_follow_sets(&mut fixed, FollowStrategy::FixedPoint, FollowRule::NextSymbol);
    assert_eq!(fixed.follow('A'), Some(&set("x")));
    assert_eq!(fixed.follow('B'), Some(&set("x")));
}

#[test]
fn follow_graph_edges() {
    let mut g = grammar(include_str!("../grammars/expression.def"));
    compute_first_sets(&mut g);
    let graph = compute_follow_sets(&mut g, FollowStrategy::FixedPoint, FollowRule::NextSymbol);

    let mut edges: Vec<(char, char)> = graph
        .edge_indices()
        .filter_map(|e| graph.edge_endpoints(e))
        .map(|(a, b)| (graph[a], graph[b]))
        .collect();
    edges.sort();
    assert_eq!(edges, vec![('E', 'T'), ('E', 'X'), ('X', 'T')]);
}

#[test]
fn nullable_follower_hands_over_lhs_follow() {
    // A is followed by the nullable B and then d
    let def = "S=ABd A=a A=# B=b B=#";
    for follow in [FollowStrategy::SinglePass, FollowStrategy::FixedPoint] {
        let mut g = grammar(def);
        compute_first_sets(&mut g);
        compute_follow_sets(&mut g, follow, FollowRule::NextSymbol);
        assert_eq!(g.follow('A'), Some(&set("b$")), "{:?}", follow);
        assert_eq!(g.follow('B'), Some(&set("d")), "{:?}", follow);

        let mut g = grammar(def);
        compute_first_sets(&mut g);
        compute_follow_sets(&mut g, follow, FollowRule::NullableSuffix);
        assert_eq!(g.follow('A'), Some(&set("bd")), "{:?}", follow);
        assert_eq!(g.follow('B'), Some(&set("d")), "{:?}", follow);
    }
}

#[test]
fn follow_rule_shapes_the_graph() {
    let def = "S=ABd A=a A=# B=b B=#";
    let edges = |rule| {
        let mut g = grammar(def);
        compute_first_sets(&mut g);
        let graph = compute_follow_sets(&mut g, FollowStrategy::FixedPoint, rule);
        let mut edges: Vec<(char, char)> = graph
            .edge_indices()
            .filter_map(|e| graph.edge_endpoints(e))
            .map(|(a, b)| (graph[a], graph[b]))
            .collect();
        edges.sort();
        edges
    };
    assert_eq!(edges(FollowRule::NextSymbol), vec![('S', 'A')]);
    assert!(edges(FollowRule::NullableSuffix).is_empty());
}

#[test]
fn default_table_follows_next_symbol_rule() {
    let def = "S=ABd A=a A=# B=b B=#";
    let literal = Analysis::new(grammar(def), AnalysisConfig::default());
    assert_eq!(
        literal.table().entry(literal.grammar(), 'A', Symbol::Terminal('d')),
        None
    );
    assert!(!literal.parse("d").accepted());
    assert!(literal.parse("bd").accepted());

    let suffix = Analysis::new(
        grammar(def),
        AnalysisConfig {
            follow_rule: FollowRule::NullableSuffix,
            ..Default::default()
        },
    );
    assert_eq!(
        suffix.table().entry(suffix.grammar(), 'A', Symbol::Terminal('d')),
        Some(2)
    );
    assert!(suffix.parse("d").accepted());
}

#[test]
fn conflicts_become_diagnostics() {
    let analysis = Analysis::new(
        grammar(include_str!("../grammars/conflict.def")),
        AnalysisConfig::default(),
    );
    let conflict = TableConflict {
        nonterminal: 'S',
        terminal: Symbol::Terminal('a'),
        kept: 1,
        discarded: 0,
    };
    assert_eq!(analysis.diagnostics(), &[Diagnostic::TableConflict(conflict)]);

    let analysis = Analysis::new(
        grammar(include_str!("../grammars/conflict.def")),
        AnalysisConfig {
            conflicts: ConflictPolicy::KeepFirst,
            ..Default::default()
        },
    );
    let conflict = TableConflict {
        kept: 0,
        discarded: 1,
        ..conflict
    };
    assert_eq!(analysis.diagnostics(), &[Diagnostic::TableConflict(conflict)]);
}

#[test]
fn pipeline_is_deterministic() {
    let def = include_str!("../grammars/arithmetic.def");
    let a = Analysis::new(grammar(def), AnalysisConfig::default());
    let b = Analysis::new(grammar(def), AnalysisConfig::default());

    for (x, y) in a.grammar().nonterminals().iter().zip(b.grammar().nonterminals()) {
        assert_eq!(x.symbol, y.symbol);
        assert_eq!(x.first, y.first);
        assert_eq!(x.follow, y.follow);
    }
    let (rows, columns) = a.table().dimensions();
    assert_eq!((rows, columns), b.table().dimensions());
    for nt in 0..rows {
        for t in 0..columns {
            assert_eq!(a.table().get(nt, t), b.table().get(nt, t));
        }
    }
}
