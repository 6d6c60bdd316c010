//! Reflective, rule-based object validation
//!
//! Fields declare constraints, the validator reads them once per type and
//! checks every field of an instance, cascading into nested objects and
//! collections. Every violation is collected instead of stopping at the
//! first one. A fluent builder mixes the declared constraints with checks
//! written at the call site.
//!
//! # Examples
//!
//! ## Declared constraints
//!
//! ```
//! use veritas::{Validate, Validator};
//!
//! #[derive(Validate)]
//! struct User {
//!     #[validate(not_null)]
//!     name: Option<String>,
//!     #[validate(email)]
//!     email: String,
//!     #[validate(size(min = 8, max = 20))]
//!     password: String,
//! }
//!
//! let user = User {
//!     name: None,
//!     email: "invalidEmail".to_string(),
//!     password: "short".to_string(),
//! };
//!
//! let result = Validator::new().check(&user).validate();
//! assert_eq!(result.len(), 3);
//! ```
//!
//! ## Nested objects
//!
//! A not-null field holding an object, or a collection of objects, is
//! validated with the nested type's own constraints.
//!
//! ```
//! use veritas::{Validate, Validator};
//!
//! #[derive(Validate)]
//! struct Line {
//!     #[validate(min = 1)]
//!     quantity: u32,
//! }
//!
//! #[derive(Validate)]
//! struct Order {
//!     #[validate(not_null)]
//!     lines: Vec<Line>,
//! }
//!
//! let order = Order { lines: vec![Line { quantity: 0 }, Line { quantity: 2 }] };
//! let result = Validator::new().accumulate_validate(&order);
//! assert_eq!(result.messages(), ["Field 'quantity' must be >= 1"]);
//! ```
//!
//! ## Fluent checks and named rules
//!
//! ```
//! use veritas::{RuleBuilder, Validate, Validator};
//!
//! #[derive(Validate)]
//! struct Account {
//!     handle: String,
//! }
//!
//! let validator = Validator::new();
//! validator.rules().register_rule(
//!     "handle",
//!     RuleBuilder::new().length_at_least(3).matches("[a-z0-9_]+").unwrap().build(),
//! );
//!
//! let account = Account { handle: "Al".to_string() };
//! let result = validator
//!     .check(&account)
//!     .apply_rule("handle", "handle", "handle must be 3+ lowercase characters")
//!     .apply_rule("reserved", "handle", "")
//!     .validate();
//!
//! assert_eq!(
//!     result.messages(),
//!     ["handle must be 3+ lowercase characters", "No rule found for: reserved"]
//! );
//! ```

extern crate self as veritas;

mod builder;
pub mod checks;
mod config;
mod constraint;
mod dispatch;
mod engine;
mod errors;
mod messages;
mod metadata;
mod pipeline;
mod profiles;
mod rules;
mod validator;
mod value;

pub use builder::ValidationBuilder;
pub use checks::EmailPolicy;
pub use config::{ConfigError, EmailMode, ValidatorConfig};
pub use constraint::{Constraint, ConstraintKind};
pub use dispatch::{Dispatcher, FieldCheck, default_message};
pub use errors::{
    FieldAccessError, OBJECT_FIELD, ValidationFailure, ValidationResult, Violation,
};
pub use messages::{I18nResolver, MessageResolver, NoMessages, english_bundle, french_bundle};
pub use metadata::{
    FieldAccessor, FieldDescriptor, FieldMetadata, Inspect, MetadataCache, TypeMetadata,
    Validatable,
};
pub use pipeline::ValidationPipeline;
pub use profiles::{Profile, ProfileRegistry};
pub use rules::{CompositeRule, Rule, RuleBuilder, RuleRegistry};
pub use validator::Validator;
pub use value::{Elements, Reflect, Sequence, Value};

// Re-export derive macros
pub use veritas_derive::{Reflect, Validate};

// Re-export the message catalog
pub use veritas_i18n::{I18n, Locale, MessageBundle};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Constraint, Reflect, RuleBuilder, Validatable, Validate, ValidationFailure,
        ValidationResult, Validator, Value, Violation,
    };
}
