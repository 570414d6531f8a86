//! End-to-end tests over the QDIMACS surface: parse, preprocess, and
//! search the reference scenarios, and round generated instances through
//! the whole pipeline.

use qbf_solver::qbf::generate::{Generator, Params, DEFAULT_DUP_LIMIT};
use qbf_solver::qbf::preprocess::Verdict;
use qbf_solver::qbf::qdimacs::parse_qdimacs_text;
use qbf_solver::qbf::search::Search;

fn decide(text: &str) -> Verdict {
    let mut preprocessor = parse_qdimacs_text(text).expect("input parses");
    match preprocessor.preprocess() {
        Verdict::Unknown => {
            let mut search = Search::new(preprocessor.snapshot());
            search.solve()
        }
        verdict => verdict,
    }
}

#[test]
fn unit_chain_is_sat() {
    assert_eq!(decide("e 1 0\n1 0\n"), Verdict::Sat);
}

#[test]
fn immediate_contradiction_is_unsat() {
    assert_eq!(decide("e 1 0\n1 0\n-1 0\n"), Verdict::Unsat);
}

#[test]
fn universal_falsifies() {
    let text = "p cnf 2 2\n\
                a 1 0\n\
                e 2 0\n\
                1 2 0\n\
                1 -2 0\n";
    assert_eq!(decide(text), Verdict::Unsat);
}

#[test]
fn existential_mirrors_universal() {
    let text = "p cnf 2 2\n\
                a 1 0\n\
                e 2 0\n\
                -1 2 0\n\
                1 -2 0\n";
    assert_eq!(decide(text), Verdict::Sat);
}

#[test]
fn alternating_four_variable_formula() {
    let text = "c alternating prefix\n\
                p cnf 4 4\n\
                e 1 0\n\
                a 2 0\n\
                e 3 4 0\n\
                1 -2 0\n\
                -1 3 0\n\
                2 4 0\n\
                3 4 0\n";
    assert_eq!(decide(text), Verdict::Sat);
}

#[test]
fn pure_literal_sweep_empties_the_matrix() {
    let text = "e 1 2 0\n1 2 0\n1 -2 0\n";

    let mut preprocessor = parse_qdimacs_text(text).unwrap();
    assert_eq!(preprocessor.preprocess(), Verdict::Sat);
    assert_eq!(preprocessor.assignment().value(1), Some(true));
    assert!(preprocessor.matrix().is_empty());
}

#[test]
fn empty_matrix_with_prefix_is_sat() {
    assert_eq!(decide("a 1 0\ne 2 0\n"), Verdict::Sat);
}

#[test]
fn empty_clause_is_unsat() {
    assert_eq!(decide("e 1 0\n0\n"), Verdict::Unsat);
}

#[test]
fn generated_instances_round_through_the_pipeline() {
    let params = Params {
        num_blocks: 2,
        num_clauses: 12,
        block_sizes: vec![3, 5],
        block_literals: vec![1, 2],
        seed: 99,
        dup_limit: DEFAULT_DUP_LIMIT,
        sort_clauses: true,
    };

    let text = Generator::new(params.clone()).unwrap().generate().to_qdimacs();
    let again = Generator::new(params).unwrap().generate().to_qdimacs();
    assert_eq!(text, again, "generation is deterministic for a fixed seed");

    let first = decide(&text);
    let second = decide(&text);
    assert_eq!(first, second, "solving is deterministic");
    assert_ne!(first, Verdict::Unknown);
}

#[test]
fn search_leaves_its_snapshot_intact() {
    let text = "e 1 0\na 2 0\ne 3 4 0\n1 -2 0\n-1 3 0\n2 4 0\n3 4 0\n";

    let mut preprocessor = parse_qdimacs_text(text).unwrap();
    assert_eq!(preprocessor.preprocess(), Verdict::Unknown);

    let snapshot = preprocessor.snapshot();
    let mut search = Search::new(snapshot.clone());
    search.solve();

    assert_eq!(search.matrix(), &snapshot.matrix);
    assert_eq!(search.assignment(), &snapshot.assignment);
}
