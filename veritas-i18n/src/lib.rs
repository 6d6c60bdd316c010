//! Localized messages for Veritas
//!
//! A small message-catalog layer: per-locale bundles, locale fallback and
//! positional argument substitution. The validation engine only sees it
//! through its `MessageResolver` boundary, so any catalog can be swapped in.
//!
//! # Quick Start
//!
//! ```rust
//! use veritas_i18n::{I18n, Locale, MessageBundle};
//!
//! let i18n = I18n::new()
//!     .with_default_locale(Locale::en())
//!     .with_bundle(
//!         &Locale::en(),
//!         MessageBundle::new().with("error.min", "Field '{0}' must be >= {1}"),
//!     );
//!
//! assert_eq!(
//!     i18n.t_args("error.min", &Locale::en_us(), &[&"age", &18]),
//!     "Field 'age' must be >= 18"
//! );
//! assert_eq!(i18n.t("error.unknown", &Locale::en()), "??error.unknown??");
//! ```

mod error;
mod locale;
mod messages;

pub use error::I18nError;
pub use locale::Locale;
pub use messages::{
    I18n, MessageBundle, Messages, format_positional, is_placeholder, placeholder,
};

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, I18nError>;
