// Built-in value checks

use once_cell::sync::Lazy;
use regex::Regex;

/// Address shape used by [`EmailPolicy::strict`]. The domain needs at
/// least one dotted label.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
        .expect("built-in email regex compiles")
});

/// How email constraints without a declared regex are checked.
#[derive(Debug, Clone, Default)]
pub enum EmailPolicy {
    /// Contains both `@` and `.`
    #[default]
    Pragmatic,
    /// Full match against a regex
    Strict(Regex),
}

impl EmailPolicy {
    /// Strict policy using the built-in address regex.
    pub fn strict() -> Self {
        EmailPolicy::Strict(EMAIL_REGEX.clone())
    }

    /// Whether `value` passes. A declared regex takes precedence over the policy.
    pub fn accepts(&self, declared: Option<&Regex>, value: &str) -> bool {
        if let Some(regex) = declared {
            return regex.is_match(value);
        }
        match self {
            EmailPolicy::Pragmatic => looks_like_email(value),
            EmailPolicy::Strict(regex) => regex.is_match(value),
        }
    }
}

/// The pragmatic shape check: an `@` and a `.` somewhere.
pub fn looks_like_email(value: &str) -> bool {
    value.contains('@') && value.contains('.')
}

/// Whether the length of `value` in characters lies in `[min, max]`.
pub fn length_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}
