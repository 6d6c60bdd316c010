//! The validation context.

use crate::builder::ValidationBuilder;
use crate::checks::EmailPolicy;
use crate::config::{ConfigError, ValidatorConfig};
use crate::dispatch::Dispatcher;
use crate::messages::{I18nResolver, MessageResolver};
use crate::metadata::{MetadataCache, Validatable};
use crate::pipeline::ValidationPipeline;
use crate::profiles::ProfileRegistry;
use crate::rules::RuleRegistry;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

static GLOBAL: Lazy<Validator> = Lazy::new(|| match ValidatorConfig::from_env() {
    Ok(config) => Validator::from_config(&config).unwrap_or_else(|err| {
        veritas_log::warn!(target: "veritas", "invalid validator configuration, using defaults: {}", err);
        Validator::new()
    }),
    Err(err) => {
        veritas_log::warn!(target: "veritas", "invalid validator environment, using defaults: {}", err);
        Validator::new()
    }
});

/// Owns everything a validation call reads: the metadata cache, the
/// message resolver, the rule and profile registries and the email policy.
///
/// Cloning is cheap and clones share state.
///
/// # Examples
///
/// ```
/// use veritas::{Validate, Validator};
///
/// #[derive(Validate)]
/// struct Signup {
///     #[validate(not_null)]
///     name: Option<String>,
///     #[validate(email)]
///     email: String,
/// }
///
/// let validator = Validator::new();
/// let signup = Signup { name: None, email: "nobody".into() };
///
/// let result = validator.check(&signup).validate();
/// assert_eq!(result.len(), 2);
/// assert_eq!(result.violations()[0].message, "Field 'name' cannot be null");
/// ```
#[derive(Clone)]
pub struct Validator {
    cache: Arc<MetadataCache>,
    messages: Arc<dyn MessageResolver>,
    rules: Arc<RuleRegistry>,
    profiles: Arc<ProfileRegistry>,
    email: EmailPolicy,
}

impl Validator {
    /// Fresh context: empty cache and registries, built-in English and
    /// French messages, pragmatic email checks.
    pub fn new() -> Self {
        Self {
            cache: Arc::new(MetadataCache::new()),
            messages: Arc::new(I18nResolver::default()),
            rules: Arc::new(RuleRegistry::new()),
            profiles: Arc::new(ProfileRegistry::new()),
            email: EmailPolicy::default(),
        }
    }

    /// Context configured from `config`.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let resolver = I18nResolver::with_defaults(config.locale()?);
        Ok(Self::new()
            .with_messages(resolver)
            .with_email_policy(config.email_policy()?))
    }

    /// Process-wide default context, configured from the environment on
    /// first use.
    pub fn global() -> &'static Validator {
        &GLOBAL
    }

    pub fn with_messages(self, messages: impl MessageResolver + 'static) -> Self {
        self.with_shared_messages(Arc::new(messages))
    }

    pub fn with_shared_messages(mut self, messages: Arc<dyn MessageResolver>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_rules(mut self, rules: Arc<RuleRegistry>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_profiles(mut self, profiles: Arc<ProfileRegistry>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_email_policy(mut self, email: EmailPolicy) -> Self {
        self.email = email;
        self
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    pub fn messages(&self) -> &dyn MessageResolver {
        self.messages.as_ref()
    }

    pub fn email_policy(&self) -> &EmailPolicy {
        &self.email
    }

    pub(crate) fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self.messages.as_ref(), &self.email)
    }

    /// Start a fluent validation of `target`.
    pub fn check<'a, T: Validatable>(&'a self, target: &'a T) -> ValidationBuilder<'a, T> {
        ValidationBuilder::new(self, Some(target))
    }

    /// Start a fluent validation of a target that may be absent.
    pub fn check_optional<'a, T: Validatable>(
        &'a self,
        target: Option<&'a T>,
    ) -> ValidationBuilder<'a, T> {
        ValidationBuilder::new(self, target)
    }

    /// Start a request pipeline.
    pub fn pipeline<T: Validatable>(&self) -> ValidationPipeline<'_, T> {
        ValidationPipeline::new(self)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("cached_types", &self.cache.len())
            .field("rules", &self.rules.len())
            .field("profiles", &self.profiles.len())
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_validator_is_send_sync() {
        assert_send_sync::<Validator>();
    }

    #[test]
    fn test_clones_share_state() {
        let validator = Validator::new();
        let clone = validator.clone();
        clone.rules().register("always", |_| true);
        assert!(validator.rules().lookup("always").is_some());
    }

    #[test]
    fn test_from_config() {
        let config = ValidatorConfig::from_toml_str("locale = \"fr\"\nemail_mode = \"strict\"").unwrap();
        let validator = Validator::from_config(&config).unwrap();
        assert!(matches!(validator.email_policy(), EmailPolicy::Strict(_)));
        assert!(!validator.email_policy().accepts(None, "invalidEmail@localhost"));
        assert_eq!(
            validator.messages().resolve("error.notNull", &[&"nom"]).as_deref(),
            Some("Le champ 'nom' est obligatoire")
        );
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Validator::global(), Validator::global()));
    }
}
