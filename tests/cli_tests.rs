#![cfg(feature = "cli")]

use std::io::Write;

use attrql::ast::TokenKind;
use attrql::cli::{
    execute_check, execute_facet, execute_tokens, get_doc_category, load_compiler, CheckOptions,
    CheckResult, CliError, FacetOptions,
};
use attrql::{FacetCount, Predicate, SearchCompiler};
use serde_json::json;

const RECORDS: &str = r#"[
    {"id": 1, "lab": "Doe Lab", "number_of_electrodes": 64},
    {"id": 2, "lab": "Roe Lab", "number_of_electrodes": 16},
    {"id": 3, "lab": "doe lab", "number_of_electrodes": 32}
]"#;

fn compiler() -> SearchCompiler {
    load_compiler(None).unwrap()
}

fn check(query: &str, input: Option<&str>, syntax_only: bool) -> Result<CheckResult, CliError> {
    let options = CheckOptions {
        query: query.to_string(),
        input: input.map(str::to_string),
        syntax_only,
    };
    execute_check(&compiler(), &options)
}

#[test]
fn test_check_syntax_only() {
    let result = check("lab = 'x'", Some(RECORDS), true).unwrap();
    assert!(matches!(result, CheckResult::SyntaxValid));
}

#[test]
fn test_check_without_input_compiles() {
    match check("electrodes != 3", None, false).unwrap() {
        CheckResult::Compiled(predicate) => assert_eq!(
            predicate,
            Predicate::negate(Predicate::eq("number_of_electrodes", 3))
        ),
        other => panic!("Expected compiled predicate, got {:?}", other),
    }
}

#[test]
fn test_check_filters_records() {
    match check("lab = 'doe lab' and electrodes < 50", Some(RECORDS), false).unwrap() {
        CheckResult::Matches(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0]["id"], json!(3));
        }
        other => panic!("Expected matches, got {:?}", other),
    }
}

#[test]
fn test_check_reads_json_lines() {
    let input = "{\"lab\": \"a\"}\n{\"lab\": \"b\"}";
    match check("lab in ['b']", Some(input), false).unwrap() {
        CheckResult::Matches(records) => assert_eq!(records, vec![json!({"lab": "b"})]),
        other => panic!("Expected matches, got {:?}", other),
    }
}

#[test]
fn test_check_invalid_query() {
    let error = check("lab =", None, false).unwrap_err();
    assert!(matches!(error, CliError::Query(_)));
    assert!(error.to_string().starts_with("invalid query: "));
}

#[test]
fn test_check_rejects_non_records() {
    assert!(matches!(
        check("lab = 'x'", Some("[\"lab\"]"), false),
        Err(CliError::NotRecords("a string"))
    ));
}

#[test]
fn test_check_bad_json() {
    assert!(matches!(
        check("lab = 'x'", Some("{not json"), false),
        Err(CliError::Json(_))
    ));
}

#[test]
fn test_tokens() {
    let tokens = execute_tokens(&compiler(), "units in [1]").unwrap();
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Attribute("units".to_string()),
            TokenKind::In,
            TokenKind::LBracket,
            TokenKind::Integer(1),
            TokenKind::RBracket,
        ]
    );
}

#[test]
fn test_tokens_stop_at_error() {
    assert!(matches!(
        execute_tokens(&compiler(), "lab = ?"),
        Err(CliError::Query(attrql::Error::Lex(_)))
    ));
}

#[test]
fn test_facet_requires_input() {
    let options = FacetOptions {
        column: "lab".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        execute_facet(&compiler(), &options),
        Err(CliError::NoInput)
    ));
}

#[test]
fn test_facet_counts() {
    let options = FacetOptions {
        column: "electrodes > 20".to_string(),
        query: None,
        input: Some(RECORDS.to_string()),
    };
    let counts = execute_facet(&compiler(), &options).unwrap();
    assert_eq!(
        counts,
        vec![
            FacetCount {
                facet: json!(true),
                count: 2
            },
            FacetCount {
                facet: json!(false),
                count: 1
            },
        ]
    );
}

#[test]
fn test_facet_counts_filtered() {
    let options = FacetOptions {
        column: "lab".to_string(),
        query: Some("electrodes >= 32".to_string()),
        input: Some(RECORDS.to_string()),
    };
    let counts = execute_facet(&compiler(), &options).unwrap();
    assert_eq!(
        counts,
        vec![
            FacetCount {
                facet: json!("Doe Lab"),
                count: 1
            },
            FacetCount {
                facet: json!("doe lab"),
                count: 1
            },
        ]
    );
}

#[test]
fn test_facet_invalid_column() {
    let options = FacetOptions {
        column: "lab or units".to_string(),
        query: None,
        input: Some(RECORDS.to_string()),
    };
    assert!(matches!(
        execute_facet(&compiler(), &options),
        Err(CliError::Query(_))
    ));
}

#[test]
fn test_load_compiler_from_schema() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[attribute]]\nname = \"species\"\npath = \"subject__species\"").unwrap();

    let compiler = load_compiler(Some(file.path())).unwrap();
    assert_eq!(
        compiler.parse("species = 'mouse'").unwrap(),
        Predicate::eq("subject__species", "mouse")
    );
}

#[test]
fn test_load_compiler_bad_schema() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[attribute]]\nname = \"or\"\npath = \"x\"").unwrap();

    assert!(matches!(
        load_compiler(Some(file.path())),
        Err(CliError::Schema(_))
    ));
}

#[test]
fn test_doc_categories() {
    for name in ["syntax", "OPERATORS", "attributes", "facets", "errors"] {
        assert!(get_doc_category(name).is_ok(), "Failed for category: {}", name);
    }
}

#[test]
fn test_unknown_doc_category() {
    match get_doc_category("bogus") {
        Err(CliError::UnknownCategory(name)) => assert_eq!(name, "bogus"),
        other => panic!("Expected unknown category, got {:?}", other),
    }
}
