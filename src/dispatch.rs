//! Maps each declared constraint to its check and builds violations.

use crate::checks::{EmailPolicy, length_within};
use crate::constraint::{Constraint, ConstraintKind};
use crate::errors::{FieldAccessError, Violation};
use crate::messages::MessageResolver;
use crate::metadata::{FieldMetadata, Inspect};
use crate::value::Value;
use std::fmt::Display;
use veritas_i18n::is_placeholder;

/// Outcome of applying one field's constraints.
#[derive(Debug)]
pub struct FieldCheck<'a> {
    /// The value that was read, for cascading
    pub value: Value<'a>,
    /// Violations in declaration order
    pub violations: Vec<Violation>,
}

/// Runs constraint checks with a given resolver and email policy.
#[derive(Clone, Copy)]
pub struct Dispatcher<'v> {
    messages: &'v dyn MessageResolver,
    email: &'v EmailPolicy,
}

impl<'v> Dispatcher<'v> {
    pub fn new(messages: &'v dyn MessageResolver, email: &'v EmailPolicy) -> Self {
        Self { messages, email }
    }

    /// Read `field` off `target` once and check each of its constraints.
    pub fn apply<'a>(
        &self,
        target: &'a dyn Inspect,
        field: &FieldMetadata,
    ) -> Result<FieldCheck<'a>, FieldAccessError> {
        let value = field.read(target.as_any())?;
        let violations = field
            .constraints()
            .iter()
            .filter_map(|constraint| self.check(field.name(), &value, constraint))
            .collect();

        Ok(FieldCheck { value, violations })
    }

    /// Check one value against one constraint.
    ///
    /// Constraints that do not apply to the value's kind pass.
    pub fn check(&self, field: &str, value: &Value<'_>, constraint: &Constraint) -> Option<Violation> {
        let failed = match (constraint.kind(), value) {
            (ConstraintKind::NotNull, value) => value.is_null(),
            (ConstraintKind::Email { regex }, Value::Text(text)) => {
                !self.email.accepts(regex.as_ref(), text)
            }
            (ConstraintKind::Size { min, max }, Value::Text(text)) => {
                !length_within(text, *min, *max)
            }
            (ConstraintKind::Min(bound), value) => value.as_i64().is_some_and(|n| n < *bound),
            (ConstraintKind::Max(bound), value) => value.as_i64().is_some_and(|n| n > *bound),
            (ConstraintKind::Pattern { regex: Some(regex), .. }, Value::Text(text)) => {
                !regex.is_match(text)
            }
            _ => false,
        };

        failed.then(|| {
            Violation::new(field, self.message_for(field, constraint))
                .with_constraint(constraint.code())
                .with_snapshot(value.snapshot())
        })
    }

    /// Literal message, else the resolved key, else the synthesized default.
    pub fn message_for(&self, field: &str, constraint: &Constraint) -> String {
        if let Some(message) = constraint.message() {
            return message.to_string();
        }

        let key = constraint.message_key();
        let resolved = match constraint.kind() {
            ConstraintKind::Min(bound) | ConstraintKind::Max(bound) => {
                self.messages.resolve(key, &[&field as &dyn Display, bound])
            }
            _ => self.messages.resolve(key, &[&field]),
        };

        match resolved {
            Some(message) if !is_placeholder(&message) => message,
            _ => {
                veritas_log::trace!(
                    target: "veritas::messages",
                    "no message for key '{}', using default for field '{}'",
                    key,
                    field
                );
                default_message(field, constraint.kind())
            }
        }
    }
}

/// `Field '<name>' <reason>`
pub fn default_message(field: &str, kind: &ConstraintKind) -> String {
    format!("Field '{}' {}", field, kind.default_reason())
}
