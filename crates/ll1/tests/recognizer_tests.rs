use ll1::{Analysis, AnalysisConfig, Grammar, Markers, ParseError};

fn arithmetic() -> Analysis {
    let def = include_str!("../src/grammars/arithmetic.def");
    let grammar = Grammar::from_def(def, Markers::default()).expect("failed");
    Analysis::new(grammar, AnalysisConfig::default())
}

fn run_vectors(analysis: &Analysis, tests: &[(&str, bool)]) {
    for (input, expected) in tests {
        let run = analysis.parse(input);
        assert_eq!(
            run.accepted(),
            *expected,
            "input '{}', expect accept: {}, verdict: {:?}",
            input,
            expected,
            run.verdict
        );
    }
}

#[test]
fn arithmetic_vectors() {
    let analysis = arithmetic();
    assert!(analysis.diagnostics().is_empty());

    let test_vectors = vec![
        ("i", true),
        ("i+i", true),
        ("i*i", true),
        ("i+i*i", true),
        ("(i+i)*i", true),
        ("((i))", true),
        ("i*(i+i)*i+i", true),
        ("", false),
        ("+", false),
        ("i+", false),
        ("(i", false),
        ("i)", false),
        ("ii", false),
        ("()", false),
        ("i-i", false),
    ];
    run_vectors(&analysis, &test_vectors);
}

#[test]
fn arithmetic_errors() {
    let analysis = arithmetic();
    // both tails vanish on `)`, leaving the end marker on the stack
    assert_eq!(
        analysis.parse("i)").verdict,
        Err(ParseError::UnexpectedSymbol('$'))
    );
    assert_eq!(
        analysis.parse("i-i").verdict,
        Err(ParseError::InvalidLookahead('-'))
    );
    assert_eq!(
        analysis.parse("(i").verdict,
        Err(ParseError::UnexpectedSymbol(')'))
    );
    assert_eq!(
        analysis.parse("ii").verdict,
        Err(ParseError::NoProduction {
            nonterminal: 'Y',
            lookahead: 'i'
        })
    );
}

#[test]
fn left_recursive_grammar_still_builds() {
    // not LL(1); the table is built anyway and the conflicts are reported
    let grammar = Grammar::from_def("E=E+T E=T T=i", Markers::default()).expect("failed");
    let analysis = Analysis::new(grammar, AnalysisConfig::default());
    assert!(!analysis.diagnostics().is_empty());
    assert!(analysis.parse("i").accepted());
}

#[test]
fn left_recursive_production_in_the_table_is_rejected() {
    // E=E+T is declared last, so it takes the (E, i) cell
    let grammar = Grammar::from_def("E=T E=E+T T=i", Markers::default()).expect("failed");
    let analysis = Analysis::new(grammar, AnalysisConfig::default());

    for input in ["i", "i+i", ""] {
        let run = analysis.parse(input);
        if input.is_empty() {
            assert_eq!(
                run.verdict,
                Err(ParseError::NoProduction {
                    nonterminal: 'E',
                    lookahead: '$'
                })
            );
        } else {
            assert_eq!(run.verdict, Err(ParseError::LeftRecursion('E')), "input '{}'", input);
            assert_eq!(run.steps.len(), 2);
            assert_eq!(run.steps[1].stack, "$T+E");
        }
    }
}
