use attrql::ast::CompareOp;
use attrql::evaluator::{resolve_path, EvalError, Evaluator};
use attrql::{Predicate, SearchCompiler, Value};
use serde_json::{json, Value as Json};

fn datasets() -> Vec<Json> {
    vec![
        json!({
            "id": 1,
            "lab": "Doe Lab",
            "institution": "MIT",
            "number_of_electrodes": 64,
            "units": 12,
            "keywords": [{"keyword": "cortex"}, {"keyword": "mouse"}],
            "related_publications": [{"doi": "10.1000/a"}]
        }),
        json!({
            "id": 2,
            "lab": "Roe Lab",
            "institution": "Stanford",
            "number_of_electrodes": 16,
            "units": 3,
            "keywords": [{"keyword": "hippocampus"}],
            "related_publications": []
        }),
        json!({
            "id": 3,
            "lab": "doe lab",
            "institution": null,
            "number_of_electrodes": 32,
            "keywords": [],
            "related_publications": [{"doi": "10.1000/b"}, {"doi": "10.1000/c"}]
        }),
    ]
}

fn matching_ids(query: &str) -> Vec<i64> {
    let compiler = SearchCompiler::with_default_table().unwrap();
    let predicate = compiler.parse(query).unwrap();
    let records = datasets();
    Evaluator::new()
        .filter(&predicate, &records)
        .unwrap()
        .into_iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Field Paths
// ============================================================================

#[test]
fn test_resolve_plain_field() {
    let record = json!({"lab": "Doe Lab"});
    assert_eq!(resolve_path(&record, "lab"), vec![&json!("Doe Lab")]);
}

#[test]
fn test_resolve_fans_out_over_arrays() {
    let record = json!({"keywords": [{"keyword": "a"}, {"keyword": "b"}, {"other": 1}]});
    assert_eq!(
        resolve_path(&record, "keywords__keyword"),
        vec![&json!("a"), &json!("b")]
    );
}

#[test]
fn test_resolve_nested_objects() {
    let record = json!({"subject": {"species": {"name": "Mus musculus"}}});
    assert_eq!(
        resolve_path(&record, "subject__species__name"),
        vec![&json!("Mus musculus")]
    );
}

#[test]
fn test_resolve_missing_and_null() {
    let record = json!({"lab": null, "tags": [null, "x"]});
    assert!(resolve_path(&record, "lab").is_empty());
    assert!(resolve_path(&record, "missing").is_empty());
    assert!(resolve_path(&record, "lab__name").is_empty());
    assert_eq!(resolve_path(&record, "tags"), vec![&json!("x")]);
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_string_equality_ignores_case() {
    assert_eq!(matching_ids("lab = 'DOE LAB'"), vec![1, 3]);
}

#[test]
fn test_integer_equality() {
    assert_eq!(matching_ids("electrodes = 32"), vec![3]);
}

#[test]
fn test_not_equal() {
    assert_eq!(matching_ids("lab != 'doe lab'"), vec![2]);
}

#[test]
fn test_not_equal_includes_missing() {
    // Record 3 has no units; negation of a failed equality holds.
    assert_eq!(matching_ids("units != 12"), vec![2, 3]);
}

#[test]
fn test_ordering() {
    assert_eq!(matching_ids("electrodes > 16"), vec![1, 3]);
    assert_eq!(matching_ids("electrodes >= 16"), vec![1, 2, 3]);
    assert_eq!(matching_ids("electrodes < 32"), vec![2]);
    assert_eq!(matching_ids("electrodes <= 32"), vec![2, 3]);
}

#[test]
fn test_ordering_skips_missing() {
    assert_eq!(matching_ids("units >= 0"), vec![1, 2]);
}

#[test]
fn test_ordering_on_floats() {
    let record = json!({"age": 2.5});
    let evaluator = Evaluator::new();
    assert!(evaluator
        .matches(&Predicate::compare("age", CompareOp::Gt, 2), &record)
        .unwrap());
    assert!(!evaluator
        .matches(&Predicate::compare("age", CompareOp::Gte, 3), &record)
        .unwrap());
}

#[test]
fn test_ordering_against_strings_is_false() {
    let record = json!({"lab": "10"});
    assert!(!Evaluator::new()
        .matches(&Predicate::compare("lab", CompareOp::Lt, 100), &record)
        .unwrap());
}

#[test]
fn test_hand_built_string_ordering_fails() {
    let predicate = Predicate::compare("lab", CompareOp::Lt, "x");
    let result = Evaluator::new().matches(&predicate, &json!({"lab": "a"}));
    assert_eq!(
        result,
        Err(EvalError::NonIntegerOrdering {
            field: "lab".to_string(),
            op: CompareOp::Lt,
            value: Value::from("x"),
        })
    );
}

#[test]
fn test_hand_built_not_eq() {
    let predicate = Predicate::compare("lab", CompareOp::NotEq, "doe lab");
    let records = datasets();
    let kept = Evaluator::new().filter(&predicate, &records).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0]["id"], json!(2));
}

// ============================================================================
// Relations
// ============================================================================

#[test]
fn test_relation_equality_matches_any() {
    assert_eq!(matching_ids("keyword = 'MOUSE'"), vec![1]);
    assert_eq!(matching_ids("doi = '10.1000/c'"), vec![3]);
}

#[test]
fn test_relation_negation() {
    assert_eq!(matching_ids("not keyword = 'cortex'"), vec![2, 3]);
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_membership() {
    assert_eq!(
        matching_ids(r#"keyword in ["cortex", "hippocampus"]"#),
        vec![1, 2]
    );
}

#[test]
fn test_membership_is_case_sensitive() {
    assert_eq!(matching_ids("lab in ['doe lab']"), vec![3]);
}

#[test]
fn test_membership_integers() {
    assert_eq!(matching_ids("electrodes in [16, 64, 'x']"), vec![1, 2]);
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn test_and_or_not() {
    assert_eq!(
        matching_ids("lab = 'doe lab' and electrodes >= 64"),
        vec![1]
    );
    assert_eq!(
        matching_ids("institution = 'stanford' or electrodes = 32"),
        vec![2, 3]
    );
    assert_eq!(
        matching_ids("not (lab = 'doe lab' and electrodes >= 64)"),
        vec![2, 3]
    );
}

#[test]
fn test_precedence_reaches_evaluation() {
    // a or (b and c) vs (a or b) and c
    assert_eq!(
        matching_ids("lab = 'roe lab' or lab = 'doe lab' and electrodes > 40"),
        vec![1, 2]
    );
    assert_eq!(
        matching_ids("(lab = 'roe lab' or lab = 'doe lab') and electrodes > 40"),
        vec![1]
    );
}

#[test]
fn test_operator_combinators() {
    let predicate = !(Predicate::eq("lab", "doe lab") & Predicate::compare(
        "number_of_electrodes",
        CompareOp::Gt,
        40,
    )) | Predicate::eq("units", 12);
    let records = datasets();
    let ids: Vec<_> = Evaluator::new()
        .filter(&predicate, &records)
        .unwrap()
        .into_iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
}
