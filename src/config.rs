// Validator configuration

use crate::checks::EmailPolicy;
use crate::constraint::compile_full_match;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use veritas_i18n::{I18nError, Locale};

/// Environment variable naming the message locale
pub const LOCALE_VAR: &str = "VERITAS_LOCALE";
/// Environment variable selecting `pragmatic` or `strict` email checks
pub const EMAIL_MODE_VAR: &str = "VERITAS_EMAIL_MODE";
/// Environment variable overriding the strict email regex
pub const EMAIL_REGEX_VAR: &str = "VERITAS_EMAIL_REGEX";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid locale: {0}")]
    InvalidLocale(#[from] I18nError),

    #[error("Invalid email mode '{0}', expected 'pragmatic' or 'strict'")]
    InvalidEmailMode(String),

    #[error("Invalid email regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// How email constraints without their own regex are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailMode {
    /// Contains `@` and `.`
    #[default]
    Pragmatic,
    /// Full match against the configured or built-in address regex
    Strict,
}

impl FromStr for EmailMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pragmatic" => Ok(EmailMode::Pragmatic),
            "strict" => Ok(EmailMode::Strict),
            _ => Err(ConfigError::InvalidEmailMode(s.to_string())),
        }
    }
}

/// Settings for building a [`Validator`](crate::Validator).
///
/// ```
/// use veritas::{EmailMode, ValidatorConfig};
///
/// let config = ValidatorConfig::from_toml_str(r#"
///     locale = "fr-FR"
///     email_mode = "strict"
/// "#).unwrap();
///
/// assert_eq!(config.email_mode, EmailMode::Strict);
/// assert_eq!(config.locale().unwrap().language, "fr");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Locale tag for messages
    pub locale: String,
    pub email_mode: EmailMode,
    /// Regex for strict mode; the built-in address regex when unset
    pub email_regex: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            email_mode: EmailMode::Pragmatic,
            email_regex: None,
        }
    }
}

impl ValidatorConfig {
    /// Defaults overridden by `VERITAS_LOCALE`, `VERITAS_EMAIL_MODE` and
    /// `VERITAS_EMAIL_REGEX`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`ValidatorConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(locale) = lookup(LOCALE_VAR) {
            config.locale = locale;
        }
        if let Some(mode) = lookup(EMAIL_MODE_VAR) {
            config.email_mode = mode.parse()?;
        }
        if let Some(regex) = lookup(EMAIL_REGEX_VAR) {
            config.email_regex = Some(regex);
        }

        Ok(config)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// The configured locale.
    pub fn locale(&self) -> Result<Locale> {
        Ok(Locale::parse(&self.locale)?)
    }

    /// The email policy this configuration selects.
    pub fn email_policy(&self) -> Result<EmailPolicy> {
        match (self.email_mode, &self.email_regex) {
            (EmailMode::Pragmatic, _) => Ok(EmailPolicy::Pragmatic),
            (EmailMode::Strict, None) => Ok(EmailPolicy::strict()),
            (EmailMode::Strict, Some(pattern)) => compile_full_match(pattern)
                .map(EmailPolicy::Strict)
                .map_err(|source| ConfigError::InvalidRegex {
                    pattern: pattern.clone(),
                    source,
                }),
        }
    }
}
