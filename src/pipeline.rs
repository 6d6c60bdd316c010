// Validation pipeline for incoming requests

use crate::errors::ValidationResult;
use crate::metadata::Validatable;
use crate::validator::Validator;

type FailureHandler<'a> = Box<dyn FnOnce(&ValidationResult) + 'a>;
type SuccessHandler<'a> = Box<dyn FnOnce() + 'a>;

/// Validates a request with its declared constraints plus an optional
/// named profile, then runs exactly one of the success or failure handlers.
///
/// ```
/// use veritas::{Validate, Validator};
///
/// #[derive(Validate)]
/// struct CreateUser {
///     #[validate(not_null)]
///     name: Option<String>,
/// }
///
/// let validator = Validator::new();
/// let request = CreateUser { name: None };
/// let mut rejected = Vec::new();
///
/// let result = validator
///     .pipeline()
///     .validate_request(&request)
///     .on_failure(|result| rejected.extend(result.messages().iter().map(|m| m.to_string())))
///     .on_success(|| unreachable!())
///     .execute();
///
/// assert!(result.has_errors());
/// assert_eq!(rejected, ["Field 'name' cannot be null"]);
/// ```
pub struct ValidationPipeline<'a, T: Validatable> {
    validator: &'a Validator,
    request: Option<&'a T>,
    rule_set: Option<String>,
    on_failure: Option<FailureHandler<'a>>,
    on_success: Option<SuccessHandler<'a>>,
}

impl<'a, T: Validatable> ValidationPipeline<'a, T> {
    pub(crate) fn new(validator: &'a Validator) -> Self {
        Self {
            validator,
            request: None,
            rule_set: None,
            on_failure: None,
            on_success: None,
        }
    }

    /// The request to validate. Without one, execution reports
    /// `Target object is null`.
    pub fn validate_request(mut self, request: &'a T) -> Self {
        self.request = Some(request);
        self
    }

    /// Apply the named profile after the declared constraints.
    pub fn with_rule_set(mut self, name: impl Into<String>) -> Self {
        self.rule_set = Some(name.into());
        self
    }

    pub fn on_failure<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&ValidationResult) + 'a,
    {
        self.on_failure = Some(Box::new(handler));
        self
    }

    pub fn on_success<F>(mut self, handler: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        self.on_success = Some(Box::new(handler));
        self
    }

    /// Validate and run the matching handler.
    pub fn execute(self) -> ValidationResult {
        let mut builder = self.validator.check_optional(self.request);
        if let Some(name) = &self.rule_set {
            builder = builder.apply_profile(name);
        }
        let result = builder.validate();

        if result.has_errors() {
            if let Some(handler) = self.on_failure {
                handler(&result);
            }
        } else if let Some(handler) = self.on_success {
            handler();
        }

        result
    }
}
