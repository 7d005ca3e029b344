use attrql::ast::{CompareOp, FacetExpression, Predicate, TokenKind};
use attrql::evaluator::{Evaluator, FacetCount};
use attrql::lexer::LexError;
use attrql::parser::{Error, ParseError};
use attrql::{SearchCompiler, Value};
use serde_json::{json, Value as Json};

fn compiler() -> SearchCompiler {
    SearchCompiler::with_default_table().unwrap()
}

fn facet(input: &str) -> FacetExpression {
    compiler()
        .parse_facet(input)
        .unwrap_or_else(|e| panic!("Failed to parse facet {:?}: {}", input, e))
}

fn count(facet: Json, count: usize) -> FacetCount {
    FacetCount { facet, count }
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_plain_column() {
    assert_eq!(facet("lab"), FacetExpression::column("lab"));
    assert_eq!(facet("  Keyword  "), FacetExpression::column("keywords__keyword"));
}

#[test]
fn test_rule_column() {
    assert_eq!(
        facet("electrodes >= 32"),
        FacetExpression::bucketed(
            "number_of_electrodes",
            Predicate::compare("number_of_electrodes", CompareOp::Gte, 32)
        )
    );
}

#[test]
fn test_rule_column_not_equal() {
    assert_eq!(
        facet("lab != 'x'"),
        FacetExpression::bucketed("lab", Predicate::negate(Predicate::eq("lab", "x")))
    );
}

#[test]
fn test_membership_column() {
    assert_eq!(
        facet("keyword in ['cortex']"),
        FacetExpression::bucketed(
            "keywords__keyword",
            Predicate::membership("keywords__keyword", vec![Value::from("cortex")])
        )
    );
}

#[test]
fn test_facet_rejects_combinators() {
    let test_cases = vec![
        "lab and units",
        "lab = 'x' and units > 1",
        "lab units",
        "(lab)",
        "not lab",
    ];

    for input in test_cases {
        assert!(
            matches!(compiler().parse_facet(input), Err(Error::Parse(_))),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_facet_rejects_empty() {
    assert!(matches!(
        compiler().parse_facet(""),
        Err(Error::Parse(ParseError::UnexpectedEnd { expected: "an attribute", .. }))
    ));
}

#[test]
fn test_facet_rejects_string_ordering() {
    match compiler().parse_facet("units < 'x'") {
        Err(Error::Parse(ParseError::UnexpectedToken { kind, .. })) => {
            assert_eq!(kind, TokenKind::String("x".to_string()))
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_facet_unknown_attribute() {
    assert!(matches!(
        compiler().parse_facet("species"),
        Err(Error::Lex(LexError::UnexpectedInput { .. }))
    ));
}

#[test]
fn test_facet_display() {
    assert_eq!(facet("doi").to_string(), "related_publications__doi");
    assert_eq!(facet("units > 3").to_string(), "units > 3");
}

// ============================================================================
// Counting
// ============================================================================

fn records() -> Vec<Json> {
    vec![
        json!({"lab": "a", "units": 5, "keywords": [{"keyword": "x"}, {"keyword": "y"}]}),
        json!({"lab": "b", "units": 1, "keywords": [{"keyword": "x"}]}),
        json!({"lab": "a", "units": 9, "keywords": []}),
        json!({"lab": null, "units": 2}),
    ]
}

#[test]
fn test_counts_by_value() {
    let counts = Evaluator::new()
        .facet_counts(&facet("lab"), &records())
        .unwrap();
    assert_eq!(counts, vec![count(json!("a"), 2), count(json!("b"), 1)]);
}

#[test]
fn test_counts_fan_out_over_relations() {
    let counts = Evaluator::new()
        .facet_counts(&facet("keyword"), &records())
        .unwrap();
    assert_eq!(counts, vec![count(json!("x"), 2), count(json!("y"), 1)]);
}

#[test]
fn test_counts_by_bucket() {
    let counts = Evaluator::new()
        .facet_counts(&facet("units >= 5"), &records())
        .unwrap();
    assert_eq!(counts, vec![count(json!(false), 2), count(json!(true), 2)]);
}

#[test]
fn test_counts_over_filtered_records() {
    let compiler = compiler();
    let predicate = compiler.parse("units > 1").unwrap();
    let records = records();
    let evaluator = Evaluator::new();

    let kept = evaluator.filter(&predicate, &records).unwrap();
    let counts = evaluator
        .facet_counts(&compiler.parse_facet("lab").unwrap(), kept)
        .unwrap();
    assert_eq!(counts, vec![count(json!("a"), 2)]);
}

#[test]
fn test_counts_of_nothing() {
    let counts = Evaluator::new()
        .facet_counts(&facet("lab"), &Vec::<Json>::new())
        .unwrap();
    assert!(counts.is_empty());
}
