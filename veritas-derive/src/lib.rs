// Derive macros for the Veritas validator
// These macros generate the per-type field tables the engine reads at runtime

use proc_macro::TokenStream;

mod attrs;
mod reflect;
mod validate;

/// Generates `Validatable` and `Reflect` for a struct.
///
/// Every field that is not marked `#[validate(skip)]` is listed in the
/// type's metadata, in declaration order, together with the constraints
/// declared on it. Field types must implement `veritas::Reflect`.
///
/// ```ignore
/// #[derive(Validate)]
/// struct User {
///     #[validate(not_null)]
///     name: Option<String>,
///     #[validate(email)]
///     email: String,
///     #[validate(size(min = 8, max = 20))]
///     password: String,
///     #[validate(min = 18, max(value = 120, message = "too old"))]
///     age: i32,
///     #[validate(skip)]
///     session: Session,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate))]
pub fn validate_derive(input: TokenStream) -> TokenStream {
    validate::validate_derive_impl(input)
}

/// Generates `Reflect` for an enum, reporting the variant name.
///
/// Enum values are leaves for the validator: they can be checked for
/// presence but are never cascaded into.
#[proc_macro_derive(Reflect)]
pub fn reflect_derive(input: TokenStream) -> TokenStream {
    reflect::reflect_derive_impl(input)
}
