// Named rules and rule composition

use crate::constraint::compile_full_match;
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Value<'_>) -> bool + Send + Sync>;

/// A reusable predicate over field values.
#[derive(Clone)]
pub struct Rule {
    predicate: Predicate,
}

impl Rule {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Whether `value` passes.
    pub fn test(&self, value: &Value<'_>) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

/// Rules looked up by name from the fluent builder.
///
/// Registering a name again replaces the earlier rule.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under `name`.
    pub fn register<F>(&self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_rule(name, Rule::new(predicate));
    }

    /// Register an already built rule, e.g. a [`CompositeRule`].
    pub fn register_rule(&self, name: impl Into<String>, rule: impl Into<Rule>) {
        self.rules.write().insert(name.into(), rule.into());
    }

    pub fn lookup(&self, name: &str) -> Option<Rule> {
        self.rules.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

type TextCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
struct TextRule {
    check: TextCheck,
    message: String,
}

/// Builds a [`CompositeRule`] from text checks.
///
/// ```
/// use veritas::{Reflect, RuleBuilder};
///
/// let password = RuleBuilder::new()
///     .length_at_least(8)
///     .matches(".*[0-9].*")
///     .unwrap()
///     .build();
///
/// assert!(password.test(&"secret123".reflect()));
/// assert!(!password.test(&"secret".reflect()));
/// assert_eq!(
///     password.error_messages(),
///     "Must be at least 8 characters; Must match pattern .*[0-9].*; "
/// );
/// ```
#[derive(Clone, Default)]
pub struct RuleBuilder {
    rules: Vec<TextRule>,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text must have at least `min` characters.
    pub fn length_at_least(self, min: usize) -> Self {
        self.length_at_least_with(min, format!("Must be at least {min} characters"))
    }

    pub fn length_at_least_with(self, min: usize, message: impl Into<String>) -> Self {
        self.custom(move |text| text.chars().count() >= min, message)
    }

    /// Text must fully match `regex`.
    pub fn matches(self, regex: &str) -> Result<Self, regex::Error> {
        let message = format!("Must match pattern {regex}");
        self.matches_with(regex, message)
    }

    pub fn matches_with(self, regex: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        let compiled = compile_full_match(regex)?;
        Ok(self.custom(move |text| compiled.is_match(text), message))
    }

    /// Any text check.
    pub fn custom<F>(mut self, check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.push(TextRule {
            check: Arc::new(check),
            message: message.into(),
        });
        self
    }

    pub fn build(self) -> CompositeRule {
        CompositeRule {
            rules: self.rules.into(),
        }
    }
}

/// Conjunction of text checks. Non-text values never pass.
#[derive(Clone)]
pub struct CompositeRule {
    rules: Arc<[TextRule]>,
}

impl CompositeRule {
    pub fn test(&self, value: &Value<'_>) -> bool {
        value
            .as_text()
            .is_some_and(|text| self.rules.iter().all(|rule| (rule.check)(text)))
    }

    /// Every rule's message, each followed by `"; "`.
    pub fn error_messages(&self) -> String {
        self.rules
            .iter()
            .map(|rule| format!("{}; ", rule.message))
            .collect()
    }

    /// Messages of the rules `text` fails.
    pub fn failures(&self, text: &str) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| !(rule.check)(text))
            .map(|rule| rule.message.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for CompositeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.rules.iter().map(|rule| &rule.message).collect();
        f.debug_struct("CompositeRule").field("rules", &messages).finish()
    }
}

impl From<CompositeRule> for Rule {
    fn from(composite: CompositeRule) -> Self {
        Rule::new(move |value| composite.test(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Reflect;

    #[test]
    fn test_register_and_lookup() {
        let registry = RuleRegistry::new();
        assert!(registry.lookup("adult").is_none());

        registry.register("adult", |v| v.as_i64().is_some_and(|age| age >= 18));
        let rule = registry.lookup("adult").unwrap();

        assert!(rule.test(&30i32.reflect()));
        assert!(!rule.test(&12i32.reflect()));
        assert!(!rule.test(&"30".reflect()));
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = RuleRegistry::new();
        registry.register("flag", |_| false);
        registry.register("flag", |_| true);

        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("flag").unwrap().test(&Value::Null));
    }

    #[test]
    fn test_composite_rule() {
        let rule = RuleBuilder::new()
            .length_at_least_with(3, "too short")
            .matches_with("[a-z]+", "lowercase only")
            .unwrap()
            .build();

        assert_eq!(rule.len(), 2);
        assert!(rule.test(&"abc".reflect()));
        assert!(!rule.test(&"ab".reflect()));
        assert!(!rule.test(&"ABC".reflect()));
        assert!(!rule.test(&Value::Null));
        assert_eq!(rule.failures("A"), ["too short", "lowercase only"]);
        assert_eq!(rule.error_messages(), "too short; lowercase only; ");
    }

    #[test]
    fn test_composite_in_registry() {
        let registry = RuleRegistry::new();
        registry.register_rule("slug", RuleBuilder::new().length_at_least(2).build());
        assert!(registry.contains("slug"));
        assert!(registry.lookup("slug").unwrap().test(&"ok".reflect()));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(RuleBuilder::new().matches("(unclosed").is_err());
    }

    #[test]
    fn test_empty_composite_accepts_any_text() {
        let rule = RuleBuilder::new().build();
        assert!(rule.is_empty());
        assert!(rule.test(&"".reflect()));
        assert_eq!(rule.error_messages(), "");
    }
}
