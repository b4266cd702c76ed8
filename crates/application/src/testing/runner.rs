//! Assertion runner implementation.
//!
//! Evaluates assertions against a response, stopping at the first violation.

use reqres_domain::response::ResponseSpec;
use reqres_domain::testing::{Assertion, AssertionFailure};
use serde_json::{Map, Value};

/// Runner that evaluates assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssertionRunner;

impl AssertionRunner {
    /// Create a new assertion runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run assertions in order against a response.
    ///
    /// # Errors
    ///
    /// Returns the first violated assertion; later ones are not evaluated.
    pub fn run(&self, assertions: &[Assertion], response: &ResponseSpec) -> Result<(), AssertionFailure> {
        assertions
            .iter()
            .try_for_each(|assertion| self.run_assertion(assertion, response))
    }

    /// Run a single assertion against a response.
    ///
    /// # Errors
    ///
    /// Returns the violation if the assertion does not hold.
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> Result<(), AssertionFailure> {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(response, *expected),
            Assertion::RequiredFields { path, fields } => {
                let json = parse_body(response)?;
                check_required_fields(&json, path, fields)
            }
            Assertion::EachHasFields { path, fields } => {
                let json = parse_body(response)?;
                check_each_has_fields(&json, path, fields)
            }
            Assertion::NotEmpty { path } => {
                let json = parse_body(response)?;
                let items = array_at(&json, path)?;
                if items.is_empty() {
                    Err(AssertionFailure::EmptyCollection { path: path.clone() })
                } else {
                    Ok(())
                }
            }
            Assertion::MaxItems { path, max } => {
                let json = parse_body(response)?;
                let items = array_at(&json, path)?;
                if items.len() <= *max {
                    Ok(())
                } else {
                    Err(AssertionFailure::TooManyItems {
                        path: path.clone(),
                        max: *max,
                        actual: items.len(),
                    })
                }
            }
            Assertion::JsonPathEquals { path, expected } => {
                let json = parse_body(response)?;
                let actual = value_at(&json, path)?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(AssertionFailure::ValueMismatch {
                        path: path.clone(),
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    })
                }
            }
            Assertion::StringContains { path, needle } => {
                let json = parse_body(response)?;
                check_string_contains(&json, path, needle)
            }
            Assertion::EmptyBody => {
                if response.is_body_empty() {
                    Ok(())
                } else {
                    Err(AssertionFailure::NonEmptyBody {
                        actual: preview(&response.body),
                    })
                }
            }
        }
    }
}

fn check_status_code(response: &ResponseSpec, expected: u16) -> Result<(), AssertionFailure> {
    let actual = response.status;
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionFailure::StatusMismatch { expected, actual })
    }
}

fn check_required_fields(json: &Value, path: &str, fields: &[String]) -> Result<(), AssertionFailure> {
    let value = value_at(json, path)?;
    let object = value
        .as_object()
        .ok_or_else(|| type_mismatch(path, "object", value))?;
    let missing = missing_fields(object, fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AssertionFailure::MissingFields {
            path: path.to_string(),
            fields: missing,
        })
    }
}

fn check_each_has_fields(json: &Value, path: &str, fields: &[String]) -> Result<(), AssertionFailure> {
    for (index, item) in array_at(json, path)?.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| type_mismatch(&format!("{path}[{index}]"), "object", item))?;
        let missing = missing_fields(object, fields);
        if !missing.is_empty() {
            return Err(AssertionFailure::ElementMissingFields {
                path: path.to_string(),
                index,
                fields: missing,
            });
        }
    }
    Ok(())
}

fn check_string_contains(json: &Value, path: &str, needle: &str) -> Result<(), AssertionFailure> {
    let value = value_at(json, path)?;
    let text = value
        .as_str()
        .ok_or_else(|| type_mismatch(path, "string", value))?;
    if text.contains(needle) {
        Ok(())
    } else {
        Err(AssertionFailure::MissingSubstring {
            path: path.to_string(),
            needle: needle.to_string(),
            actual: text.to_string(),
        })
    }
}

/// Fields from `fields` that `object` lacks, in declared order.
fn missing_fields(object: &Map<String, Value>, fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .filter(|field| !object.contains_key(field.as_str()))
        .cloned()
        .collect()
}

fn parse_body(response: &ResponseSpec) -> Result<Value, AssertionFailure> {
    response
        .body_as_json()
        .map_err(|e| AssertionFailure::InvalidJson {
            reason: e.to_string(),
        })
}

fn value_at<'a>(json: &'a Value, path: &str) -> Result<&'a Value, AssertionFailure> {
    match query_json_path(json, path) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(AssertionFailure::PathNotFound {
            path: path.to_string(),
        }),
        Err(reason) => Err(AssertionFailure::InvalidPath {
            path: path.to_string(),
            reason,
        }),
    }
}

fn array_at<'a>(json: &'a Value, path: &str) -> Result<&'a Vec<Value>, AssertionFailure> {
    let value = value_at(json, path)?;
    value
        .as_array()
        .ok_or_else(|| type_mismatch(path, "array", value))
}

fn type_mismatch(path: &str, expected: &str, actual: &Value) -> AssertionFailure {
    AssertionFailure::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: preview(&actual.to_string()),
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 100;
    if text.chars().count() > LIMIT {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Query a JSON value using a simple JSONPath-like syntax.
/// Supports: $, $.field, $.field.nested, $.array[0]
fn query_json_path<'a>(json: &'a Value, path: &str) -> Result<Option<&'a Value>, String> {
    let path = path.trim();
    let Some(rest) = path.strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };

    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let mut current = json;

    for segment in rest.split('.').filter(|s| !s.is_empty()) {
        let (name, index) = parse_array_access(segment)?;
        if !name.is_empty() {
            current = match current.get(name) {
                Some(v) => v,
                None => return Ok(None),
            };
        }
        if let Some(idx) = index {
            current = match current.get(idx) {
                Some(v) => v,
                None => return Ok(None),
            };
        }
    }

    Ok(Some(current))
}

/// Parse a segment like "field[0]" into ("field", Some(0)).
fn parse_array_access(segment: &str) -> Result<(&str, Option<usize>), String> {
    let Some(bracket_start) = segment.find('[') else {
        return Ok((segment, None));
    };
    let Some(inner) = segment[bracket_start + 1..].strip_suffix(']') else {
        return Err(format!("Unclosed bracket in segment: {segment}"));
    };
    let index = inner
        .parse()
        .map_err(|_| format!("Invalid array index: {inner}"))?;
    Ok((&segment[..bracket_start], Some(index)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn users_page() -> ResponseSpec {
        ResponseSpec::json(
            200,
            &json!({
                "page": 2,
                "per_page": 3,
                "data": [
                    {"id": 4, "email": "eve.holt@reqres.in", "first_name": "Eve", "last_name": "Holt"},
                    {"id": 5, "email": "charles.morris@reqres.in", "first_name": "Charles", "last_name": "Morris"}
                ]
            }),
        )
    }

    #[test]
    fn test_status_code() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::empty(404);

        assert_eq!(runner.run_assertion(&Assertion::status(404), &response), Ok(()));
        assert_eq!(
            runner.run_assertion(&Assertion::status(200), &response),
            Err(AssertionFailure::StatusMismatch {
                expected: 200,
                actual: 404
            })
        );
    }

    #[test]
    fn test_required_fields_reports_missing_in_declared_order() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::json(201, &json!({"id": "7"}));

        let result = runner.run_assertion(&Assertion::fields("$", &["name", "id", "job"]), &response);
        assert_eq!(
            result,
            Err(AssertionFailure::MissingFields {
                path: "$".to_string(),
                fields: vec!["name".to_string(), "job".to_string()],
            })
        );
    }

    #[test]
    fn test_each_has_fields() {
        let runner = AssertionRunner::new();
        let assertion = Assertion::each_has_fields("$.data", &["id", "email", "first_name", "last_name"]);
        assert_eq!(runner.run_assertion(&assertion, &users_page()), Ok(()));

        let response = ResponseSpec::json(200, &json!({"data": [{"id": 1, "email": "a@b"}, {"id": 2}]}));
        let assertion = Assertion::each_has_fields("$.data", &["id", "email"]);
        assert_eq!(
            runner.run_assertion(&assertion, &response),
            Err(AssertionFailure::ElementMissingFields {
                path: "$.data".to_string(),
                index: 1,
                fields: vec!["email".to_string()],
            })
        );
    }

    #[test]
    fn test_each_has_fields_requires_objects() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::json(200, &json!({"data": [1, 2]}));
        let result = runner.run_assertion(&Assertion::each_has_fields("$.data", &["id"]), &response);
        assert!(matches!(result, Err(AssertionFailure::TypeMismatch { path, .. }) if path == "$.data[0]"));
    }

    #[test]
    fn test_not_empty_and_max_items() {
        let runner = AssertionRunner::new();
        let response = users_page();
        assert_eq!(runner.run_assertion(&Assertion::not_empty("$.data"), &response), Ok(()));
        assert_eq!(runner.run_assertion(&Assertion::max_items("$.data", 3), &response), Ok(()));
        assert_eq!(
            runner.run_assertion(&Assertion::max_items("$.data", 1), &response),
            Err(AssertionFailure::TooManyItems {
                path: "$.data".to_string(),
                max: 1,
                actual: 2,
            })
        );

        let empty = ResponseSpec::json(200, &json!({"data": []}));
        assert_eq!(
            runner.run_assertion(&Assertion::not_empty("$.data"), &empty),
            Err(AssertionFailure::EmptyCollection {
                path: "$.data".to_string()
            })
        );
    }

    #[test]
    fn test_json_path_equals() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::json(200, &json!({"data": {"id": 2}}));
        assert_eq!(runner.run_assertion(&Assertion::equals("$.data.id", 2), &response), Ok(()));
        assert_eq!(
            runner.run_assertion(&Assertion::equals("$.data.id", 3), &response),
            Err(AssertionFailure::ValueMismatch {
                path: "$.data.id".to_string(),
                expected: "3".to_string(),
                actual: "2".to_string(),
            })
        );
        assert_eq!(
            runner.run_assertion(&Assertion::equals("$.data.name", "x"), &response),
            Err(AssertionFailure::PathNotFound {
                path: "$.data.name".to_string()
            })
        );
    }

    #[test]
    fn test_json_path_with_array_index() {
        let runner = AssertionRunner::new();
        let assertion = Assertion::equals("$.data[1].first_name", "Charles");
        assert_eq!(runner.run_assertion(&assertion, &users_page()), Ok(()));
    }

    #[test]
    fn test_string_contains() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::json(200, &json!({"data": {"email": "janet.weaver"}}));
        assert_eq!(
            runner.run_assertion(&Assertion::contains("$.data.email", "@"), &response),
            Err(AssertionFailure::MissingSubstring {
                path: "$.data.email".to_string(),
                needle: "@".to_string(),
                actual: "janet.weaver".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_body() {
        let runner = AssertionRunner::new();
        assert_eq!(runner.run_assertion(&Assertion::EmptyBody, &ResponseSpec::empty(204)), Ok(()));

        let response = ResponseSpec::json(204, &json!({"deleted": true}));
        assert!(matches!(
            runner.run_assertion(&Assertion::EmptyBody, &response),
            Err(AssertionFailure::NonEmptyBody { .. })
        ));
    }

    #[test]
    fn test_non_json_body() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::new(
            200,
            std::collections::HashMap::new(),
            b"<html></html>".to_vec(),
            std::time::Duration::ZERO,
        );
        assert!(matches!(
            runner.run_assertion(&Assertion::fields("$", &["data"]), &response),
            Err(AssertionFailure::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_invalid_path() {
        let runner = AssertionRunner::new();
        let response = users_page();
        assert!(matches!(
            runner.run_assertion(&Assertion::equals("data.id", 1), &response),
            Err(AssertionFailure::InvalidPath { .. })
        ));
        assert!(matches!(
            runner.run_assertion(&Assertion::equals("$.data[x]", 1), &response),
            Err(AssertionFailure::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let runner = AssertionRunner::new();
        let response = ResponseSpec::json(500, &json!({}));
        let assertions = vec![
            Assertion::status(200),
            Assertion::fields("$", &["data"]),
        ];

        assert_eq!(
            runner.run(&assertions, &response),
            Err(AssertionFailure::StatusMismatch {
                expected: 200,
                actual: 500
            })
        );
    }

    #[test]
    fn test_run_all_pass() {
        let runner = AssertionRunner::new();
        let assertions = vec![
            Assertion::status(200),
            Assertion::fields("$", &["page", "data"]),
            Assertion::equals("$.page", 2),
            Assertion::max_items("$.data", 3),
        ];
        assert_eq!(runner.run(&assertions, &users_page()), Ok(()));
    }
}
