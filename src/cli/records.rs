//! Reading JSON records from CLI input

use serde_json::Value as Json;

use super::CliError;

fn kind_name(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

fn ensure_record(v: Json) -> Result<Json, CliError> {
    match v {
        Json::Object(_) => Ok(v),
        other => Err(CliError::NotRecords(kind_name(&other))),
    }
}

/// Parse records from text.
///
/// Accepts a JSON array of objects, a single object, or one object per line
/// (JSON Lines).
pub fn parse_records(text: &str) -> Result<Vec<Json>, CliError> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Err(CliError::NoInput);
    }

    if trimmed.starts_with('[') {
        let records: Vec<Json> = serde_json::from_str(trimmed)?;
        return records.into_iter().map(ensure_record).collect();
    }

    serde_json::Deserializer::from_str(trimmed)
        .into_iter::<Json>()
        .map(|record| ensure_record(record?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_records() {
        let records = parse_records(r#"[{"lab": "a"}, {"lab": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn json_lines() {
        let records = parse_records("{\"lab\": \"a\"}\n{\"lab\": \"b\"}\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn scalars_are_not_records() {
        assert!(matches!(
            parse_records("[1, 2]"),
            Err(CliError::NotRecords("a number"))
        ));
    }

    #[test]
    fn blank_input() {
        assert!(matches!(parse_records("  \n"), Err(CliError::NoInput)));
    }
}
