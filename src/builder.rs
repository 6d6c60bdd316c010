// Fluent validation builder

use crate::checks::length_within;
use crate::constraint::{ConstraintKind, compile_full_match};
use crate::dispatch::default_message;
use crate::errors::{
    FieldAccessError, OBJECT_FIELD, ValidationFailure, ValidationResult, Violation,
};
use crate::metadata::{Inspect, Validatable};
use crate::validator::Validator;
use crate::value::Value;

/// Mixes the metadata-driven pass with programmatic checks on one target.
///
/// Each chained check reads its field through the type's cached metadata;
/// a field the type does not declare is skipped. Every check adds to one
/// accumulator, and a terminal call consumes the builder.
///
/// ```
/// use veritas::{Validate, Validator};
///
/// #[derive(Validate)]
/// struct Login {
///     name: Option<String>,
///     password: String,
/// }
///
/// let validator = Validator::new();
/// let login = Login { name: None, password: "short".into() };
///
/// let result = validator
///     .check(&login)
///     .skip_metadata()
///     .is_not_null("name", "")
///     .has_length_between("password", 8, 20, "password too short")
///     .validate();
///
/// assert_eq!(result.messages(), ["Field 'name' cannot be null", "password too short"]);
/// ```
pub struct ValidationBuilder<'a, T: Validatable> {
    validator: &'a Validator,
    target: Option<&'a T>,
    include_metadata: bool,
    errors: Vec<Violation>,
}

impl<'a, T: Validatable> ValidationBuilder<'a, T> {
    pub(crate) fn new(validator: &'a Validator, target: Option<&'a T>) -> Self {
        Self {
            validator,
            target,
            include_metadata: true,
            errors: Vec::new(),
        }
    }

    /// Do not run the metadata-driven pass.
    pub fn skip_metadata(mut self) -> Self {
        self.include_metadata = false;
        self
    }

    /// Whether the terminal call runs the metadata-driven pass.
    pub fn includes_metadata(&self) -> bool {
        self.include_metadata
    }

    /// The validator this builder reports through.
    pub fn validator(&self) -> &'a Validator {
        self.validator
    }

    /// Field value, or `None` when there is no target or no such field.
    fn field_value(&self, field: &str) -> Option<Value<'a>> {
        let target = self.target?;
        let metadata = self.validator.cache().get(target);

        let read = match metadata.get(field) {
            Some(descriptor) => descriptor.read(target.as_any()),
            None => Err(FieldAccessError::UnknownField {
                type_name: metadata.type_name(),
                field: field.to_string(),
            }),
        };

        read.map_err(|err| {
            veritas_log::debug!(target: "veritas::builder", "check skipped: {}", err);
        })
        .ok()
    }

    fn message_or(message: &str, default: impl FnOnce() -> String) -> String {
        if message.is_empty() {
            default()
        } else {
            message.to_string()
        }
    }

    fn report(&mut self, field: &str, message: String, constraint: &str, value: &Value<'_>) {
        self.errors.push(
            Violation::new(field, message)
                .with_constraint(constraint)
                .with_snapshot(value.snapshot()),
        );
    }

    /// Field must be present.
    pub fn is_not_null(mut self, field: &str, message: &str) -> Self {
        if let Some(value) = self.field_value(field)
            && value.is_null()
        {
            let message =
                Self::message_or(message, || default_message(field, &ConstraintKind::NotNull));
            self.report(field, message, "notNull", &value);
        }
        self
    }

    /// Text field must look like an email address, per the validator's policy.
    pub fn is_email(mut self, field: &str, message: &str) -> Self {
        if let Some(value) = self.field_value(field)
            && let Some(text) = value.as_text()
            && !self.validator.email_policy().accepts(None, text)
        {
            let message = Self::message_or(message, || {
                default_message(field, &ConstraintKind::Email { regex: None })
            });
            self.report(field, message, "email", &value);
        }
        self
    }

    /// Text field length in characters must lie in `[min, max]`.
    pub fn has_length_between(mut self, field: &str, min: usize, max: usize, message: &str) -> Self {
        if let Some(value) = self.field_value(field)
            && let Some(text) = value.as_text()
            && !length_within(text, min, max)
        {
            let message = Self::message_or(message, || {
                default_message(field, &ConstraintKind::Size { min, max })
            });
            self.report(field, message, "size", &value);
        }
        self
    }

    /// Text field must fully match `regex`. An invalid regex is logged and
    /// the check skipped.
    pub fn matches_regex(mut self, field: &str, regex: &str, message: &str) -> Self {
        let Some(value) = self.field_value(field) else {
            return self;
        };
        let Some(text) = value.as_text() else {
            return self;
        };

        let compiled = match compile_full_match(regex) {
            Ok(compiled) => compiled,
            Err(err) => {
                veritas_log::warn!(
                    target: "veritas::builder",
                    "invalid regex '{}' for field '{}', check skipped: {}",
                    regex,
                    field,
                    err
                );
                return self;
            }
        };

        if !compiled.is_match(text) {
            let message = Self::message_or(message, || {
                format!("Field '{field}' must match regex '{regex}'")
            });
            self.report(field, message, "pattern", &value);
        }
        self
    }

    /// Validate the field's value the way a not-null constraint would
    /// cascade into it. An absent value is reported as
    /// `Nested object is null`.
    pub fn cascade(mut self, field: &str) -> Self {
        let Some(value) = self.field_value(field) else {
            return self;
        };

        if value.is_null() {
            self.report(field, "Nested object is null".to_string(), "cascade", &value);
            return self;
        }

        let mut nested = ValidationResult::new();
        self.validator.cascade_into(&value, &mut nested);
        self.errors.extend(nested);
        self
    }

    /// Test the field's value with a named rule from the registry.
    pub fn apply_rule(mut self, rule_name: &str, field: &str, message: &str) -> Self {
        let Some(value) = self.field_value(field) else {
            return self;
        };

        match self.validator.rules().lookup(rule_name) {
            Some(rule) => {
                if !rule.test(&value) {
                    let message = Self::message_or(message, || {
                        format!("Field '{field}' failed rule '{rule_name}'")
                    });
                    self.report(field, message, "rule", &value);
                }
            }
            None => {
                veritas_log::debug!(target: "veritas::builder", "no rule named '{}'", rule_name);
                self.report(field, format!("No rule found for: {rule_name}"), "rule", &value);
            }
        }
        self
    }

    /// Test the whole target with `predicate`, reported on field `object`.
    ///
    /// Skipped when there is no target.
    pub fn custom_rule<F>(mut self, predicate: F, message: &str) -> Self
    where
        F: FnOnce(&T) -> bool,
    {
        if let Some(target) = self.target
            && !predicate(target)
        {
            let message =
                Self::message_or(message, || format!("Field '{OBJECT_FIELD}' failed custom rule"));
            self.errors.push(
                Violation::new(OBJECT_FIELD, message)
                    .with_constraint("custom")
                    .with_value(target.type_name()),
            );
        }
        self
    }

    /// Apply a named profile registered for `T`.
    pub fn apply_profile(mut self, name: &str) -> Self {
        match self.validator.profiles().get::<T>(name) {
            Some(profile) => profile(self),
            None => {
                veritas_log::debug!(
                    target: "veritas::builder",
                    "no profile named '{}' for {}",
                    name,
                    std::any::type_name::<T>()
                );
                self.errors.push(
                    Violation::new(OBJECT_FIELD, format!("No profile found for: {name}"))
                        .with_constraint("profile"),
                );
                self
            }
        }
    }

    /// Metadata violations (when enabled) followed by the chained ones.
    pub fn validate(self) -> ValidationResult {
        let mut result = if self.include_metadata {
            self.validator
                .validate_optional(self.target.map(|target| target as &dyn Inspect))
        } else {
            ValidationResult::new()
        };
        result.extend(self.errors);
        result
    }

    /// [`ValidationBuilder::validate`], failing when anything was found.
    pub fn validate_and_throw(self) -> Result<ValidationResult, ValidationFailure> {
        let type_name = std::any::type_name::<T>();
        let result = self.validate();
        if result.has_errors() {
            veritas_log::debug!(
                target: "veritas::builder",
                "validation of {} failed with {} violation(s)",
                type_name,
                result.len()
            );
            return Err(ValidationFailure::new(result));
        }
        Ok(result)
    }
}
