//! Message resolution for violations.

use parking_lot::RwLock;
use std::fmt::{self, Display};
use veritas_i18n::{I18n, Locale, MessageBundle, format_positional};

/// Turns a message key plus positional arguments into display text.
///
/// Returning `None`, or a `??key??` placeholder, means the key is unknown;
/// the engine then falls back to its synthesized message.
pub trait MessageResolver: Send + Sync {
    fn resolve(&self, key: &str, args: &[&dyn Display]) -> Option<String>;
}

impl<F> MessageResolver for F
where
    F: Fn(&str, &[&dyn Display]) -> Option<String> + Send + Sync,
{
    fn resolve(&self, key: &str, args: &[&dyn Display]) -> Option<String> {
        self(key, args)
    }
}

/// Resolver that knows no keys, so every message is synthesized.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMessages;

impl MessageResolver for NoMessages {
    fn resolve(&self, _key: &str, _args: &[&dyn Display]) -> Option<String> {
        None
    }
}

/// English messages for every default key.
pub fn english_bundle() -> MessageBundle {
    MessageBundle::new()
        .with("error.notNull", "Field '{0}' cannot be null")
        .with("error.invalidEmail", "Field '{0}' has an invalid email format")
        .with("error.size", "Field '{0}' has an invalid length")
        .with("error.min", "Field '{0}' must be >= {1}")
        .with("error.max", "Field '{0}' must be <= {1}")
        .with("error.pattern", "Field '{0}' does not match the required pattern")
}

/// French messages for every default key.
pub fn french_bundle() -> MessageBundle {
    MessageBundle::new()
        .with("error.notNull", "Le champ '{0}' est obligatoire")
        .with("error.invalidEmail", "Le champ '{0}' n'est pas une adresse e-mail valide")
        .with("error.size", "Le champ '{0}' a une longueur invalide")
        .with("error.min", "Le champ '{0}' doit être >= {1}")
        .with("error.max", "Le champ '{0}' doit être <= {1}")
        .with("error.pattern", "Le champ '{0}' ne respecte pas le format attendu")
}

/// [`MessageResolver`] backed by an [`I18n`] catalog and a current locale.
pub struct I18nResolver {
    i18n: I18n,
    locale: RwLock<Locale>,
}

impl I18nResolver {
    pub fn new(i18n: I18n, locale: Locale) -> Self {
        Self {
            i18n,
            locale: RwLock::new(locale),
        }
    }

    /// Catalog holding the built-in `en` and `fr` bundles, English default.
    pub fn with_defaults(locale: Locale) -> Self {
        let i18n = I18n::new()
            .with_default_locale(Locale::en())
            .with_bundle(&Locale::en(), english_bundle())
            .with_bundle(&Locale::fr(), french_bundle());
        Self::new(i18n, locale)
    }

    /// Switch the locale used for later resolutions.
    pub fn set_locale(&self, locale: Locale) {
        *self.locale.write() = locale;
    }

    pub fn locale(&self) -> Locale {
        self.locale.read().clone()
    }

    /// The underlying catalog, e.g. to add bundles.
    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }
}

impl Default for I18nResolver {
    fn default() -> Self {
        Self::with_defaults(Locale::en())
    }
}

impl MessageResolver for I18nResolver {
    fn resolve(&self, key: &str, args: &[&dyn Display]) -> Option<String> {
        let locale = self.locale.read().clone();
        self.i18n
            .lookup(key, &locale)
            .map(|template| format_positional(&template, args))
    }
}

impl fmt::Debug for I18nResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nResolver")
            .field("locale", &*self.locale.read())
            .field("i18n", &self.i18n)
            .finish()
    }
}
