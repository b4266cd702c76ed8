//! Response assertions and their outcomes.
//!
//! Assertions are plain data; evaluating them against a response happens in
//! the application layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A check to run against a response.
///
/// Paths use a small JSONPath subset: `$`, `$.field`, `$.field.nested`,
/// `$.array[0]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check the exact response status code.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// Check that the object at `path` has every field.
    RequiredFields {
        /// Path to the object.
        path: String,
        /// Field names that must be present.
        fields: Vec<String>,
    },
    /// Check that every element of the array at `path` has every field.
    EachHasFields {
        /// Path to the array.
        path: String,
        /// Field names each element must carry.
        fields: Vec<String>,
    },
    /// Check that the array at `path` is not empty.
    NotEmpty {
        /// Path to the array.
        path: String,
    },
    /// Check that the array at `path` holds at most `max` items.
    MaxItems {
        /// Path to the array.
        path: String,
        /// Maximum number of items.
        max: usize,
    },
    /// Check that the value at `path` equals `expected`.
    JsonPathEquals {
        /// Path to the value.
        path: String,
        /// Expected value.
        expected: serde_json::Value,
    },
    /// Check that the string at `path` contains `needle`.
    StringContains {
        /// Path to the string.
        path: String,
        /// Substring to search for.
        needle: String,
    },
    /// Check that the raw body is empty.
    EmptyBody,
}

impl Assertion {
    /// Status code assertion.
    #[must_use]
    pub const fn status(expected: u16) -> Self {
        Self::StatusCode { expected }
    }

    /// Required fields assertion.
    #[must_use]
    pub fn fields(path: impl Into<String>, fields: &[&str]) -> Self {
        Self::RequiredFields {
            path: path.into(),
            fields: fields.iter().map(ToString::to_string).collect(),
        }
    }

    /// Per-element required fields assertion.
    #[must_use]
    pub fn each_has_fields(path: impl Into<String>, fields: &[&str]) -> Self {
        Self::EachHasFields {
            path: path.into(),
            fields: fields.iter().map(ToString::to_string).collect(),
        }
    }

    /// Non-empty array assertion.
    #[must_use]
    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::NotEmpty { path: path.into() }
    }

    /// Array length upper bound assertion.
    #[must_use]
    pub fn max_items(path: impl Into<String>, max: usize) -> Self {
        Self::MaxItems {
            path: path.into(),
            max,
        }
    }

    /// Value equality assertion.
    #[must_use]
    pub fn equals(path: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self::JsonPathEquals {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Substring assertion.
    #[must_use]
    pub fn contains(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::StringContains {
            path: path.into(),
            needle: needle.into(),
        }
    }
}

/// The first violated condition of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssertionFailure {
    /// Response status differs from the expected one.
    #[error("expected status code {expected}, got {actual}")]
    StatusMismatch {
        /// Expected status.
        expected: u16,
        /// Received status.
        actual: u16,
    },
    /// An object lacks required fields.
    #[error("{path} is missing fields: {}", .fields.join(", "))]
    MissingFields {
        /// Path of the object.
        path: String,
        /// Missing field names.
        fields: Vec<String>,
    },
    /// An array element lacks required fields.
    #[error("{path}[{index}] is missing fields: {}", .fields.join(", "))]
    ElementMissingFields {
        /// Path of the array.
        path: String,
        /// Index of the offending element.
        index: usize,
        /// Missing field names.
        fields: Vec<String>,
    },
    /// A value differs from the expected one.
    #[error("{path}: expected {expected}, got {actual}")]
    ValueMismatch {
        /// Path of the value.
        path: String,
        /// Expected value (JSON text).
        expected: String,
        /// Received value (JSON text).
        actual: String,
    },
    /// Nothing exists at the path.
    #[error("{path} not found in response")]
    PathNotFound {
        /// Path that was looked up.
        path: String,
    },
    /// The value at the path has the wrong JSON type.
    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Path of the value.
        path: String,
        /// Expected JSON type.
        expected: String,
        /// Received value (JSON text).
        actual: String,
    },
    /// An array is empty.
    #[error("{path} is empty")]
    EmptyCollection {
        /// Path of the array.
        path: String,
    },
    /// An array is longer than allowed.
    #[error("{path}: expected at most {max} items, got {actual}")]
    TooManyItems {
        /// Path of the array.
        path: String,
        /// Upper bound.
        max: usize,
        /// Received length.
        actual: usize,
    },
    /// A string lacks the expected substring.
    #[error("{path}: '{actual}' does not contain '{needle}'")]
    MissingSubstring {
        /// Path of the string.
        path: String,
        /// Substring searched for.
        needle: String,
        /// Received string.
        actual: String,
    },
    /// The body was expected to be empty.
    #[error("expected an empty body, got '{actual}'")]
    NonEmptyBody {
        /// Received body.
        actual: String,
    },
    /// The body is not valid JSON.
    #[error("response body is not valid JSON: {reason}")]
    InvalidJson {
        /// Parser message.
        reason: String,
    },
    /// The assertion path cannot be parsed.
    #[error("invalid JSON path '{path}': {reason}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// Why it is invalid.
        reason: String,
    },
}

/// Result of running one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Every assertion held.
    Passed,
    /// Preconditions were unmet; nothing was sent.
    Skipped {
        /// Why the scenario did not run.
        reason: String,
    },
    /// An assertion was violated.
    Failed {
        /// The first violation.
        failure: AssertionFailure,
    },
}

impl ScenarioOutcome {
    /// Creates a skipped outcome.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Returns true for `Passed`.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true for `Skipped`.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Returns true for `Failed`.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Skipped { .. } => "SKIP",
            Self::Failed { .. } => "FAIL",
        }
    }
}

impl From<Result<(), AssertionFailure>> for ScenarioOutcome {
    fn from(result: Result<(), AssertionFailure>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(failure) => Self::Failed { failure },
        }
    }
}
