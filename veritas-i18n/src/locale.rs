//! Locale identifiers

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language with an optional script and region.
///
/// # Examples
///
/// ```
/// use veritas_i18n::Locale;
///
/// let fr = Locale::parse("fr").unwrap();
/// let fr_ca: Locale = "fr_CA".parse().unwrap();
/// assert_eq!(fr_ca.tag(), "fr-CA");
/// assert_eq!(fr_ca.language_only(), fr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// ISO 639 language code, lower case
    pub language: String,
    /// ISO 15924 script code, title case
    pub script: Option<String>,
    /// ISO 3166 region code, upper case
    pub region: Option<String>,
}

impl Locale {
    /// Locale from a language and an optional region.
    pub fn new(language: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            script: None,
            region: region.map(str::to_uppercase),
        }
    }

    /// Parse a BCP 47 style tag. Both `-` and `_` separators are accepted.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.trim().split(['-', '_']);

        let language = parts.next().unwrap_or_default().to_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        let mut script = None;
        let mut region = None;

        for part in parts {
            let alpha = part.chars().all(|c| c.is_ascii_alphabetic());
            match part.len() {
                4 if alpha => script = Some(title_case(part)),
                2 if alpha => region = Some(part.to_uppercase()),
                3 if part.chars().all(|c| c.is_ascii_digit()) => region = Some(part.to_string()),
                _ => return Err(I18nError::InvalidLocale(tag.to_string())),
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    /// Canonical tag, e.g. `zh-Hans-CN`.
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        for part in [&self.script, &self.region].into_iter().flatten() {
            tag.push('-');
            tag.push_str(part);
        }
        tag
    }

    /// Same language and script, region removed.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: self.script.clone(),
            region: None,
        }
    }

    /// English
    pub fn en() -> Self {
        Self::new("en", None)
    }

    /// English (US)
    pub fn en_us() -> Self {
        Self::new("en", Some("US"))
    }

    /// French
    pub fn fr() -> Self {
        Self::new("fr", None)
    }

    /// French (France)
    pub fn fr_fr() -> Self {
        Self::new("fr", Some("FR"))
    }

    /// German
    pub fn de() -> Self {
        Self::new("de", None)
    }

    /// Spanish
    pub fn es() -> Self {
        Self::new("es", None)
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en()
    }
}
