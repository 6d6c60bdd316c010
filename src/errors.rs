// Validation errors

use std::fmt;
use thiserror::Error;

/// Pseudo field name for violations about the target as a whole.
pub const OBJECT_FIELD: &str = "object";

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name that failed validation
    pub field: String,

    /// Resolved message
    pub message: String,

    /// Code of the constraint that failed
    pub constraint: String,

    /// Snapshot of the offending value (optional)
    pub value: Option<String>,
}

impl Violation {
    /// Create a new violation
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
            value: None,
        }
    }

    /// Set the constraint code
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    /// Set the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the offending value when there is one
    pub fn with_snapshot(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// The structural violation for an absent target.
    pub fn null_target() -> Self {
        Self::new(OBJECT_FIELD, "Target object is null").with_constraint("notNull")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found by one validation call, in discovery order.
///
/// Empty means valid. Nothing is deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append every violation of `other`, keeping its order
    pub fn merge(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
    }

    pub fn has_errors(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Violations reported for `field`
    pub fn get_field_errors(&self, field: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|violation| violation.field == field)
            .collect()
    }

    /// Messages in discovery order
    pub fn messages(&self) -> Vec<&str> {
        self.violations
            .iter()
            .map(|violation| violation.message.as_str())
            .collect()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl Extend<Violation> for ValidationResult {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

impl FromIterator<Violation> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationResult {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// Raised by the `*_and_throw` entry points when anything was found.
#[derive(Debug, Clone, Error)]
#[error("Validation failed with {} violation(s): {result}", .result.len())]
pub struct ValidationFailure {
    result: ValidationResult,
}

impl ValidationFailure {
    pub fn new(result: ValidationResult) -> Self {
        Self { result }
    }

    /// The full outcome
    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn into_result(self) -> ValidationResult {
        self.result
    }

    pub fn violations(&self) -> &[Violation] {
        self.result.violations()
    }
}

impl From<ValidationFailure> for ValidationResult {
    fn from(failure: ValidationFailure) -> Self {
        failure.result
    }
}

/// A field could not be read off a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    /// The accessor was handed an instance of another type
    #[error("cannot read field '{field}': target is not a {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// The type declares no such field
    #[error("type {type_name} has no field '{field}'")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let violation = Violation::new("email", "invalid email format").with_constraint("email");
        assert_eq!(violation.to_string(), "email: invalid email format");
        assert_eq!(violation.constraint, "email");
        assert!(violation.value.is_none());
    }

    #[test]
    fn test_result_keeps_order_and_duplicates() {
        let mut result = ValidationResult::new();
        assert!(result.is_valid());

        result.add(Violation::new("a", "first"));
        result.add(Violation::new("b", "second"));
        result.add(Violation::new("a", "first"));

        assert!(result.has_errors());
        assert_eq!(result.messages(), ["first", "second", "first"]);
        assert_eq!(result.get_field_errors("a").len(), 2);
    }

    #[test]
    fn test_failure_message() {
        let result: ValidationResult = [Violation::new("name", "required")].into_iter().collect();
        let failure = ValidationFailure::new(result);
        assert_eq!(
            failure.to_string(),
            "Validation failed with 1 violation(s): name: required"
        );
        assert_eq!(failure.violations().len(), 1);
    }

    #[test]
    fn test_null_target() {
        let violation = Violation::null_target();
        assert_eq!(violation.field, OBJECT_FIELD);
        assert_eq!(violation.message, "Target object is null");
    }
}
