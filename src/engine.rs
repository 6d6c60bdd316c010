//! Metadata-driven validation with cascading.
//!
//! For every field of the target's cached metadata the field is read once
//! and each declared constraint is checked. When a field declares
//! not-null and holds a value, validation recurses into that value:
//! objects are validated with their own metadata, arrays element by
//! element in position order, other collections in iteration order.
//! Primitives, text and enum values are never recursed into.
//!
//! Reflection only follows owned or shared immutable data, so a value
//! graph seen here cannot contain a cycle.

use crate::errors::{ValidationFailure, ValidationResult, Violation};
use crate::metadata::Inspect;
use crate::validator::Validator;
use crate::value::Value;

impl Validator {
    /// Validate `target` against its declared constraints, cascading into
    /// nested values, and return every violation found.
    pub fn accumulate_validate(&self, target: &dyn Inspect) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.validate_object(target, &mut result);
        result
    }

    /// Like [`Validator::accumulate_validate`], reporting an absent target
    /// as the single violation `object: Target object is null`.
    pub fn validate_optional(&self, target: Option<&dyn Inspect>) -> ValidationResult {
        match target {
            Some(target) => self.accumulate_validate(target),
            None => [Violation::null_target()].into_iter().collect(),
        }
    }

    /// Validate any field value the way a top-level call would: null is the
    /// structural violation, an object is validated, anything else has no
    /// declared constraints.
    pub fn validate_value(&self, value: &Value<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.validate_value_into(value, &mut result);
        result
    }

    /// Metadata-only validation that fails when anything was found.
    pub fn validate_and_throw(&self, target: &dyn Inspect) -> Result<ValidationResult, ValidationFailure> {
        let result = self.accumulate_validate(target);
        if result.has_errors() {
            veritas_log::debug!(
                target: "veritas::engine",
                "validation of {} failed with {} violation(s)",
                target.type_name(),
                result.len()
            );
            return Err(ValidationFailure::new(result));
        }
        Ok(result)
    }

    pub(crate) fn validate_object(&self, target: &dyn Inspect, result: &mut ValidationResult) {
        let metadata = self.cache().get(target);
        let dispatcher = self.dispatcher();

        for field in metadata.fields() {
            let check = match dispatcher.apply(target, field) {
                Ok(check) => check,
                Err(err) => {
                    veritas_log::debug!(target: "veritas::engine", "skipping field: {}", err);
                    continue;
                }
            };

            result.extend(check.violations);

            if field.requires_presence() && check.value.should_cascade() {
                self.cascade_into(&check.value, result);
            }
        }
    }

    pub(crate) fn validate_value_into(&self, value: &Value<'_>, result: &mut ValidationResult) {
        match value {
            Value::Null => result.add(Violation::null_target()),
            Value::Object(object) => self.validate_object(*object, result),
            _ => {}
        }
    }

    /// Recurse into a present value. Leaves yield nothing.
    pub(crate) fn cascade_into(&self, value: &Value<'_>, result: &mut ValidationResult) {
        match value {
            Value::Object(object) => self.validate_object(*object, result),
            Value::Array(items) | Value::Collection(items) => {
                for item in items.iter() {
                    self.validate_value_into(&item, result);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Constraint, FieldDescriptor, Reflect, TypeMetadata, Validatable, Validator, Value};

    struct Leaf {
        code: Option<String>,
    }

    impl Validatable for Leaf {
        fn describe() -> TypeMetadata {
            TypeMetadata::of::<Self>().field(
                FieldDescriptor::new("code", |target| {
                    target.downcast_ref::<Leaf>().map(|leaf| leaf.code.reflect())
                }),
                vec![Constraint::not_null()],
            )
        }
    }

    impl Reflect for Leaf {
        fn reflect(&self) -> Value<'_> {
            Value::Object(self)
        }
    }

    struct Branch {
        leaves: Vec<Option<Leaf>>,
        spare: Option<Leaf>,
    }

    impl Validatable for Branch {
        fn describe() -> TypeMetadata {
            TypeMetadata::of::<Self>()
                .field(
                    FieldDescriptor::new("leaves", |target| {
                        target.downcast_ref::<Branch>().map(|b| b.leaves.reflect())
                    }),
                    vec![Constraint::not_null()],
                )
                .field(
                    // no not-null, so never cascaded into
                    FieldDescriptor::new("spare", |target| {
                        target.downcast_ref::<Branch>().map(|b| b.spare.reflect())
                    }),
                    vec![],
                )
        }
    }

    #[test]
    fn test_cascades_into_array_elements_in_order() {
        let branch = Branch {
            leaves: vec![
                Some(Leaf { code: Some("a".into()) }),
                None,
                Some(Leaf { code: None }),
            ],
            spare: Some(Leaf { code: None }),
        };

        let result = Validator::new().accumulate_validate(&branch);
        let fields: Vec<_> = result.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["object", "code"]);
        assert_eq!(result.violations()[0].message, "Target object is null");
        assert_eq!(result.violations()[1].message, "Field 'code' cannot be null");
    }

    #[test]
    fn test_validate_optional_none() {
        let result = Validator::new().validate_optional(None);
        assert_eq!(result.len(), 1);
        assert_eq!(result.violations()[0].field, "object");
    }

    #[test]
    fn test_validate_value_ignores_leaves() {
        let validator = Validator::new();
        assert!(validator.validate_value(&42i32.reflect()).is_valid());
        assert!(validator.validate_value(&"text".reflect()).is_valid());
        assert_eq!(validator.validate_value(&Value::Null).len(), 1);
    }

    #[test]
    fn test_validate_and_throw() {
        let validator = Validator::new();
        let failure = validator
            .validate_and_throw(&Leaf { code: None })
            .unwrap_err();
        assert_eq!(failure.result().len(), 1);

        let ok = validator.validate_and_throw(&Leaf { code: Some("x".into()) }).unwrap();
        assert!(ok.is_valid());
    }

    struct Partial {
        name: Option<String>,
    }

    impl Validatable for Partial {
        fn describe() -> TypeMetadata {
            TypeMetadata::of::<Self>()
                .field(FieldDescriptor::new("ghost", |_| None), vec![Constraint::not_null()])
                .field(
                    FieldDescriptor::new("name", |target| {
                        target.downcast_ref::<Partial>().map(|p| p.name.reflect())
                    }),
                    vec![Constraint::not_null()],
                )
        }
    }

    #[test]
    fn test_unreadable_field_is_skipped() {
        let result = Validator::new().accumulate_validate(&Partial { name: None });
        assert_eq!(result.messages(), ["Field 'name' cannot be null"]);
        assert_eq!(result.violations()[0].field, "name");
    }
}
