//! Message catalogs and lookup with locale fallback.

use crate::{I18nError, Locale, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

/// Marker wrapped around a key that no catalog could resolve.
const PLACEHOLDER_MARK: &str = "??";

/// Render the placeholder returned for a missing key, e.g. `??error.min??`.
pub fn placeholder(key: &str) -> String {
    format!("{PLACEHOLDER_MARK}{key}{PLACEHOLDER_MARK}")
}

/// Whether `message` is a missing-key placeholder.
pub fn is_placeholder(message: &str) -> bool {
    message.len() > 2 * PLACEHOLDER_MARK.len()
        && message.starts_with(PLACEHOLDER_MARK)
        && message.ends_with(PLACEHOLDER_MARK)
}

/// Substitute positional `{0}`, `{1}`, ... placeholders.
///
/// Placeholders without a matching argument are left untouched.
///
/// ```
/// use veritas_i18n::format_positional;
///
/// let msg = format_positional("Field '{0}' must be >= {1}", &[&"age", &18]);
/// assert_eq!(msg, "Field 'age' must be >= 18");
/// ```
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |acc, (index, arg)| {
            acc.replace(&format!("{{{index}}}"), &arg.to_string())
        })
}

/// Messages for a single locale.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a bundle from JSON.
    ///
    /// Nested objects are flattened with `.`, so
    /// `{"error": {"min": "..."}}` defines `error.min`.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(root) = data else {
            return Err(I18nError::ParseError(
                "bundle root must be a JSON object".to_string(),
            ));
        };

        let mut bundle = Self::new();
        bundle.flatten_into("", root)?;
        Ok(bundle)
    }

    fn flatten_into(
        &mut self,
        prefix: &str,
        entries: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        for (key, value) in entries {
            let full_key = if prefix.is_empty() {
                key
            } else {
                format!("{prefix}.{key}")
            };

            match value {
                serde_json::Value::String(message) => {
                    self.messages.insert(full_key, message);
                }
                serde_json::Value::Object(nested) => self.flatten_into(&full_key, nested)?,
                other => {
                    return Err(I18nError::ParseError(format!(
                        "message '{full_key}' must be a string, found {other}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Add or replace a message.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Builder-style [`MessageBundle::add`].
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(key, message);
        self
    }

    /// Look a message up.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Whether the bundle defines `key`.
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Bundles for several locales.
#[derive(Debug, Default)]
pub struct Messages {
    bundles: HashMap<String, MessageBundle>,
}

impl Messages {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle, merging into any bundle already present for the locale.
    pub fn add_bundle(&mut self, locale: &Locale, bundle: MessageBundle) {
        self.bundles
            .entry(locale.tag())
            .or_default()
            .messages
            .extend(bundle.messages);
    }

    /// Bundle for `locale`, falling back to its language-only form.
    pub fn get_bundle(&self, locale: &Locale) -> Option<&MessageBundle> {
        self.bundles.get(&locale.tag()).or_else(|| {
            locale
                .region
                .as_ref()
                .and_then(|_| self.bundles.get(&locale.language_only().tag()))
        })
    }

    /// Locales with a bundle.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }
}

/// Thread-safe message catalog with locale fallback.
///
/// Lookup order for a key: the requested locale (then its language-only
/// form), the fallback locale, the default locale.
pub struct I18n {
    messages: Arc<RwLock<Messages>>,
    default_locale: Locale,
    fallback_locale: Option<Locale>,
}

impl I18n {
    /// Empty catalog with `en` as default locale and no fallback.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Messages::new())),
            default_locale: Locale::en(),
            fallback_locale: None,
        }
    }

    /// Set the default locale.
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Set the fallback locale.
    pub fn with_fallback(mut self, locale: Locale) -> Self {
        self.fallback_locale = Some(locale);
        self
    }

    /// Builder-style [`I18n::add_bundle`].
    pub fn with_bundle(self, locale: &Locale, bundle: MessageBundle) -> Self {
        self.add_bundle(locale, bundle);
        self
    }

    /// Add a bundle for a locale.
    pub fn add_bundle(&self, locale: &Locale, bundle: MessageBundle) {
        veritas_log::debug!(
            target: "veritas::i18n",
            "adding {} messages for locale {}",
            bundle.len(),
            locale
        );
        self.messages.write().add_bundle(locale, bundle);
    }

    /// Default locale.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Raw template for `key`, or `None` when no locale in the chain has it.
    pub fn lookup(&self, key: &str, locale: &Locale) -> Option<String> {
        let messages = self.messages.read();

        std::iter::once(locale)
            .chain(self.fallback_locale.as_ref())
            .chain(std::iter::once(&self.default_locale))
            .filter_map(|candidate| messages.get_bundle(candidate))
            .find_map(|bundle| bundle.get(key))
            .map(str::to_string)
    }

    /// Template for `key`, or the `??key??` placeholder.
    pub fn t(&self, key: &str, locale: &Locale) -> String {
        self.lookup(key, locale)
            .unwrap_or_else(|| placeholder(key))
    }

    /// Translate and substitute positional arguments.
    pub fn t_args(&self, key: &str, locale: &Locale, args: &[&dyn Display]) -> String {
        match self.lookup(key, locale) {
            Some(template) => format_positional(&template, args),
            None => placeholder(key),
        }
    }

    /// Whether `key` resolves for `locale` (fallbacks included).
    pub fn has(&self, key: &str, locale: &Locale) -> bool {
        self.lookup(key, locale).is_some()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for I18n {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            default_locale: self.default_locale.clone(),
            fallback_locale: self.fallback_locale.clone(),
        }
    }
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("default_locale", &self.default_locale)
            .field("fallback_locale", &self.fallback_locale)
            .finish_non_exhaustive()
    }
}
