//! Error types for message catalogs

use thiserror::Error;

/// Errors raised while building or loading message catalogs.
///
/// Lookups never fail with an error; a missing key is reported through
/// `Option` or the `??key??` placeholder instead.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Locale tag could not be parsed
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// A bundle source had an unexpected shape
    #[error("Failed to parse message bundle: {0}")]
    ParseError(String),

    /// JSON syntax error in a bundle source
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
