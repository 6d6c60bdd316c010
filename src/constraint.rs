//! Declared field constraints.

use regex::Regex;
use std::fmt;

/// Compile `source` so that it must match the whole input.
pub(crate) fn compile_full_match(source: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{source})$"))
}

/// Compile a declared pattern, logging and dropping it when invalid.
fn compile_declared(source: &str, constraint: &str) -> Option<Regex> {
    match compile_full_match(source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            veritas_log::warn!(
                target: "veritas::constraint",
                "ignoring {} constraint with invalid regex '{}': {}",
                constraint,
                source,
                err
            );
            None
        }
    }
}

/// The closed set of checks a field can declare.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// Value must be present
    NotNull,
    /// Text must look like an email address
    Email {
        /// Declared full-match regex, overriding the validator's email policy
        regex: Option<Regex>,
    },
    /// Text length in characters must lie in `[min, max]`
    Size { min: usize, max: usize },
    /// Number must be `>=` the bound
    Min(i64),
    /// Number must be `<=` the bound
    Max(i64),
    /// Text must fully match the regex
    Pattern {
        source: String,
        /// `None` when `source` failed to compile; the check is then skipped
        regex: Option<Regex>,
    },
}

impl ConstraintKind {
    /// Short code recorded on violations.
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintKind::NotNull => "notNull",
            ConstraintKind::Email { .. } => "email",
            ConstraintKind::Size { .. } => "size",
            ConstraintKind::Min(_) => "min",
            ConstraintKind::Max(_) => "max",
            ConstraintKind::Pattern { .. } => "pattern",
        }
    }

    /// Message key used when the declaration names none.
    pub fn default_message_key(&self) -> &'static str {
        match self {
            ConstraintKind::NotNull => "error.notNull",
            ConstraintKind::Email { .. } => "error.invalidEmail",
            ConstraintKind::Size { .. } => "error.size",
            ConstraintKind::Min(_) => "error.min",
            ConstraintKind::Max(_) => "error.max",
            ConstraintKind::Pattern { .. } => "error.pattern",
        }
    }

    /// Reason used in the synthesized `Field '<name>' <reason>` message.
    pub fn default_reason(&self) -> String {
        match self {
            ConstraintKind::NotNull => "cannot be null".to_string(),
            ConstraintKind::Email { .. } => "invalid email format".to_string(),
            ConstraintKind::Size { min, max } => {
                format!("length must be between {min} and {max}")
            }
            ConstraintKind::Min(bound) => format!("must be >= {bound}"),
            ConstraintKind::Max(bound) => format!("must be <= {bound}"),
            ConstraintKind::Pattern { source, .. } => format!("must match regex '{source}'"),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Size { min, max } => write!(f, "size({min}, {max})"),
            ConstraintKind::Min(bound) => write!(f, "min({bound})"),
            ConstraintKind::Max(bound) => write!(f, "max({bound})"),
            ConstraintKind::Pattern { source, .. } => write!(f, "pattern({source})"),
            other => f.write_str(other.code()),
        }
    }
}

/// One constraint declared on a field.
///
/// ```
/// use veritas::Constraint;
///
/// let age = Constraint::min(18).with_message_key("error.adult");
/// assert_eq!(age.message_key(), "error.adult");
///
/// let name = Constraint::not_null().with_message("name is required");
/// assert_eq!(name.message(), Some("name is required"));
/// ```
#[derive(Debug, Clone)]
pub struct Constraint {
    kind: ConstraintKind,
    message_key: Option<String>,
    message: Option<String>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            message_key: None,
            message: None,
        }
    }

    pub fn not_null() -> Self {
        Self::new(ConstraintKind::NotNull)
    }

    /// Email check following the validator's email policy.
    pub fn email() -> Self {
        Self::new(ConstraintKind::Email { regex: None })
    }

    /// Email check against a declared full-match regex.
    ///
    /// An invalid regex is logged and the validator's policy applies instead.
    pub fn email_matching(regex: &str) -> Self {
        Self::new(ConstraintKind::Email {
            regex: compile_declared(regex, "email"),
        })
    }

    pub fn size(min: usize, max: usize) -> Self {
        Self::new(ConstraintKind::Size { min, max })
    }

    pub fn min(bound: i64) -> Self {
        Self::new(ConstraintKind::Min(bound))
    }

    pub fn max(bound: i64) -> Self {
        Self::new(ConstraintKind::Max(bound))
    }

    /// Full-match regex check. An invalid regex is logged once here and the
    /// constraint never reports.
    pub fn pattern(regex: &str) -> Self {
        Self::new(ConstraintKind::Pattern {
            source: regex.to_string(),
            regex: compile_declared(regex, "pattern"),
        })
    }

    /// Literal message used verbatim. An empty message is ignored.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.is_empty()).then_some(message);
        self
    }

    /// Key resolved through the message resolver. An empty key is ignored.
    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.message_key = (!key.is_empty()).then_some(key);
        self
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Literal message, if declared.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Declared message key, else the kind's default key.
    pub fn message_key(&self) -> &str {
        self.message_key
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message_key())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_and_reasons() {
        assert_eq!(Constraint::not_null().message_key(), "error.notNull");
        assert_eq!(Constraint::email().message_key(), "error.invalidEmail");
        assert_eq!(
            Constraint::size(8, 20).kind().default_reason(),
            "length must be between 8 and 20"
        );
        assert_eq!(Constraint::min(18).kind().default_reason(), "must be >= 18");
        assert_eq!(Constraint::max(-1).kind().default_reason(), "must be <= -1");
        assert_eq!(
            Constraint::pattern("[a-z]+").kind().default_reason(),
            "must match regex '[a-z]+'"
        );
    }

    #[test]
    fn test_pattern_is_full_match() {
        let constraint = Constraint::pattern("[a-z]+");
        let ConstraintKind::Pattern { regex: Some(regex), .. } = constraint.kind() else {
            panic!("pattern should compile");
        };
        assert!(regex.is_match("abc"));
        assert!(!regex.is_match("abc1"));
        assert!(!regex.is_match("1abc"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let regex = compile_full_match("cat|dog").unwrap();
        assert!(regex.is_match("dog"));
        assert!(!regex.is_match("dogs"));
    }

    #[test]
    fn test_invalid_pattern_is_kept_without_regex() {
        let constraint = Constraint::pattern("([a-z");
        assert!(matches!(
            constraint.kind(),
            ConstraintKind::Pattern { regex: None, .. }
        ));
    }

    #[test]
    fn test_empty_message_is_ignored() {
        let constraint = Constraint::not_null().with_message("").with_message_key("");
        assert_eq!(constraint.message(), None);
        assert_eq!(constraint.message_key(), "error.notNull");
    }

    #[test]
    fn test_display() {
        assert_eq!(Constraint::size(1, 5).to_string(), "size(1, 5)");
        assert_eq!(Constraint::not_null().to_string(), "notNull");
    }
}
