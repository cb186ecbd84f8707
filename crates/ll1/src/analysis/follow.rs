use std::collections::VecDeque;

use log::{debug, trace};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::grammar::{Grammar, ProductionId, Symbol, SymbolSet, NT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FollowStrategy {
    /// Visit each nonterminal once, in table order, reading whatever FOLLOW
    /// sets the earlier visits left behind. Can under-approximate when the
    /// dependencies between FOLLOW sets point forward or form cycles.
    SinglePass,
    /// Propagate along the dependency graph until no set changes.
    #[default]
    FixedPoint,
}

/// How much of a right-hand side after an occurrence contributes to its FOLLOW set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FollowRule {
    /// Only the next symbol. When it is nullable, or there is none, FOLLOW(lhs)
    /// is added instead of looking further.
    #[default]
    NextSymbol,
    /// Everything up to the first symbol that cannot derive empty; FOLLOW(lhs)
    /// is added only when the whole remainder is nullable.
    NullableSuffix,
}

impl FollowRule {
    // the symbols after position `i` that the rule inspects
    fn window(self, rhs: &[Symbol], i: usize) -> &[Symbol] {
        match self {
            FollowRule::NextSymbol => &rhs[i + 1..rhs.len().min(i + 2)],
            FollowRule::NullableSuffix => &rhs[i + 1..],
        }
    }
}

/// Edge `A -> B` means FOLLOW(A) is contained in FOLLOW(B): some production of
/// `A` has `B` followed by nothing, or by nullable symbols the rule looks at.
/// Edges carry the production that introduced them.
pub type FollowGraph = DiGraph<char, ProductionId>;

/// Computes the FOLLOW set of every nonterminal and stores it on the grammar.
/// FIRST sets must already be final. Returns the dependency graph whichever
/// strategy was used.
pub fn compute_follow_sets(grammar: &mut Grammar, strategy: FollowStrategy, rule: FollowRule) -> FollowGraph {
    let (graph, seeds) = dependency_graph(grammar, rule);
    match strategy {
        FollowStrategy::SinglePass => single_pass(grammar, rule),
        FollowStrategy::FixedPoint => propagate(grammar, &graph, seeds),
    }
    graph
}

// Each nonterminal is a node (same index as the nonterminal table). Besides the
// graph this collects the part of every FOLLOW set that does not depend on
// other FOLLOW sets: the end marker for the start symbol plus whatever can
// begin the inspected part of a right-hand side after an occurrence.
fn dependency_graph(grammar: &Grammar, rule: FollowRule) -> (FollowGraph, Vec<SymbolSet>) {
    let mut graph = FollowGraph::new();
    let nodes: Vec<NodeIndex> = grammar
        .nonterminals
        .iter()
        .map(|record| graph.add_node(record.symbol))
        .collect();
    let mut seeds = vec![SymbolSet::new(); nodes.len()];

    if let Some(start) = grammar.nonterminal_index(grammar.start_symbol()) {
        seeds[start].insert(Symbol::EOF);
    }

    for (id, production) in grammar.productions.iter().enumerate() {
        let Some(lhs) = grammar.nonterminal_index(production.nonterminal()) else {
            continue;
        };
        let rhs = production.rhs();
        for (i, symbol) in rhs.iter().enumerate() {
            let Symbol::Nonterminal(c) = *symbol else {
                continue;
            };
            let Some(occurrence) = grammar.nonterminal_index(c) else {
                continue;
            };

            let rest = grammar.first_of_sequence(rule.window(rhs, i));
            seeds[occurrence].extend_without_empty(&rest);
            if rest.contains_empty() && lhs != occurrence {
                graph.update_edge(nodes[lhs], nodes[occurrence], id);
            }
        }
    }

    (graph, seeds)
}

fn propagate(grammar: &mut Grammar, graph: &FollowGraph, seeds: Vec<SymbolSet>) {
    let mut sets = seeds;
    let mut worklist: VecDeque<NodeIndex> = graph.node_indices().collect();
    let mut visits = 0;

    while let Some(node) = worklist.pop_front() {
        visits += 1;
        let source = sets[node.index()].clone();
        for target in graph.neighbors(node) {
            if sets[target.index()].extend_from(&source) {
                trace!("FOLLOW({}) grew from FOLLOW({})", graph[target], graph[node]);
                if !worklist.contains(&target) {
                    worklist.push_back(target);
                }
            }
        }
    }
    debug!("FOLLOW sets stable after {} visits", visits);

    for (record, follow) in grammar.nonterminals.iter_mut().zip(sets) {
        record.follow = follow;
    }
}

fn single_pass(grammar: &mut Grammar, rule: FollowRule) {
    for nt in 0..grammar.nonterminals.len() {
        let follow = follow_of(grammar, nt, rule);
        grammar.nonterminals[nt].follow = follow;
    }
}

// One visit of the rules, reading FOLLOW(lhs) as it currently stands.
fn follow_of(grammar: &Grammar, nt: NT, rule: FollowRule) -> SymbolSet {
    let symbol = grammar.nonterminals[nt].symbol;
    let mut follow = grammar.nonterminals[nt].follow.clone();

    if symbol == grammar.start_symbol() {
        follow.insert(Symbol::EOF);
    }

    for production in &grammar.productions {
        let rhs = production.rhs();
        let lhs_follow = grammar.follow(production.nonterminal());
        for (i, _) in rhs
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Symbol::Nonterminal(symbol))
        {
            let rest = grammar.first_of_sequence(rule.window(rhs, i));
            follow.extend_without_empty(&rest);
            if rest.contains_empty() {
                if let Some(lhs_follow) = lhs_follow {
                    follow.extend_from(lhs_follow);
                }
            }
        }
    }

    follow
}
