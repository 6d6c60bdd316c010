//! Parsing of `#[validate(...)]` field attributes
//!
//! Accepted forms, several per attribute and several attributes per field:
//! - `not_null`, `not_null(message = "...", message_key = "...")`
//! - `email`, `email(regex = "...", message = "...", message_key = "...")`
//! - `size(min = 1, max = 20, ...)` (min defaults to 0, max to `usize::MAX`)
//! - `min = 18`, `min(value = 18, ...)`, and the same for `max`
//! - `pattern = "..."`, `pattern(regex = "...", ...)`
//! - `skip`

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Expr, Field, LitStr, Token};

/// What a single field declared.
#[derive(Default)]
pub struct FieldOptions {
    pub skip: bool,
    pub constraints: Vec<ConstraintSpec>,
}

pub enum Kind {
    NotNull,
    Email(Option<LitStr>),
    Size {
        min: Option<Expr>,
        max: Option<Expr>,
    },
    Min(Option<Expr>),
    Max(Option<Expr>),
    Pattern(Option<LitStr>),
}

/// One declared constraint, not yet lowered to tokens.
pub struct ConstraintSpec {
    kind: Kind,
    message: Option<LitStr>,
    message_key: Option<LitStr>,
}

impl ConstraintSpec {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            message: None,
            message_key: None,
        }
    }

    /// Expression building the runtime `veritas::Constraint`.
    pub fn to_tokens(&self) -> TokenStream2 {
        let base = match &self.kind {
            Kind::NotNull => quote!(veritas::Constraint::not_null()),
            Kind::Email(None) => quote!(veritas::Constraint::email()),
            Kind::Email(Some(regex)) => quote!(veritas::Constraint::email_matching(#regex)),
            Kind::Size { min, max } => {
                let min = min.as_ref().map_or_else(|| quote!(0), |expr| quote!(#expr));
                let max = max
                    .as_ref()
                    .map_or_else(|| quote!(::core::primitive::usize::MAX), |expr| quote!(#expr));
                quote!(veritas::Constraint::size(#min, #max))
            }
            Kind::Min(value) => quote!(veritas::Constraint::min(#value)),
            Kind::Max(value) => quote!(veritas::Constraint::max(#value)),
            Kind::Pattern(regex) => quote!(veritas::Constraint::pattern(#regex)),
        };

        let message_key = self
            .message_key
            .as_ref()
            .map(|key| quote!(.with_message_key(#key)));
        let message = self
            .message
            .as_ref()
            .map(|message| quote!(.with_message(#message)));

        quote!(#base #message_key #message)
    }
}

/// Collect the `#[validate(...)]` attributes of a field.
pub fn parse_field(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("validate")) {
        attr.parse_nested_meta(|meta| {
            let name = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .ok_or_else(|| meta.error("expected a constraint name"))?;

            let spec = match name.as_str() {
                "skip" => {
                    options.skip = true;
                    return Ok(());
                }
                "not_null" => parse_not_null(&meta)?,
                "email" => parse_email(&meta)?,
                "size" => parse_size(&meta)?,
                "min" => parse_bound(&meta, "min")?,
                "max" => parse_bound(&meta, "max")?,
                "pattern" => parse_pattern(&meta)?,
                other => {
                    return Err(meta.error(format!(
                        "unknown constraint `{other}`\n\
                         hint: expected one of not_null, email, size, min, max, pattern, skip"
                    )));
                }
            };

            options.constraints.push(spec);
            Ok(())
        })?;
    }

    Ok(options)
}

/// Parse `( key = value, ... )` after a constraint name, handling the
/// shared `message` and `message_key` keys and delegating the rest.
fn parse_options(
    meta: &ParseNestedMeta<'_>,
    spec: &mut ConstraintSpec,
    mut other: impl FnMut(&str, &ParseNestedMeta<'_>, &mut Kind) -> syn::Result<()>,
) -> syn::Result<()> {
    if !meta.input.peek(syn::token::Paren) {
        return Ok(());
    }

    meta.parse_nested_meta(|inner| {
        let key = inner
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();

        match key.as_str() {
            "message" => spec.message = Some(inner.value()?.parse()?),
            "message_key" => spec.message_key = Some(inner.value()?.parse()?),
            _ => other(&key, &inner, &mut spec.kind)?,
        }
        Ok(())
    })
}

fn unknown_option(inner: &ParseNestedMeta<'_>, key: &str) -> syn::Error {
    inner.error(format!("unknown option `{key}`"))
}

fn parse_not_null(meta: &ParseNestedMeta<'_>) -> syn::Result<ConstraintSpec> {
    let mut spec = ConstraintSpec::new(Kind::NotNull);
    parse_options(meta, &mut spec, |key, inner, _| Err(unknown_option(inner, key)))?;
    Ok(spec)
}

fn parse_email(meta: &ParseNestedMeta<'_>) -> syn::Result<ConstraintSpec> {
    let mut spec = ConstraintSpec::new(Kind::Email(None));
    parse_options(meta, &mut spec, |key, inner, kind| match key {
        "regex" => {
            *kind = Kind::Email(Some(inner.value()?.parse()?));
            Ok(())
        }
        _ => Err(unknown_option(inner, key)),
    })?;
    Ok(spec)
}

fn parse_size(meta: &ParseNestedMeta<'_>) -> syn::Result<ConstraintSpec> {
    if !meta.input.peek(syn::token::Paren) {
        return Err(meta.error("`size` needs bounds, e.g. `size(min = 1, max = 20)`"));
    }

    let mut spec = ConstraintSpec::new(Kind::Size {
        min: None,
        max: None,
    });
    parse_options(meta, &mut spec, |key, inner, kind| {
        let Kind::Size { min, max } = kind else {
            return Err(unknown_option(inner, key));
        };
        match key {
            "min" => *min = Some(inner.value()?.parse()?),
            "max" => *max = Some(inner.value()?.parse()?),
            _ => return Err(unknown_option(inner, key)),
        }
        Ok(())
    })?;
    Ok(spec)
}

fn parse_bound(meta: &ParseNestedMeta<'_>, name: &str) -> syn::Result<ConstraintSpec> {
    let wrap = |value: Option<Expr>| {
        if name == "min" {
            Kind::Min(value)
        } else {
            Kind::Max(value)
        }
    };

    if meta.input.peek(Token![=]) {
        let value: Expr = meta.value()?.parse()?;
        return Ok(ConstraintSpec::new(wrap(Some(value))));
    }

    let mut spec = ConstraintSpec::new(wrap(None));
    parse_options(meta, &mut spec, |key, inner, kind| match (key, kind) {
        ("value", Kind::Min(value) | Kind::Max(value)) => {
            *value = Some(inner.value()?.parse()?);
            Ok(())
        }
        _ => Err(unknown_option(inner, key)),
    })?;

    match &spec.kind {
        Kind::Min(Some(_)) | Kind::Max(Some(_)) => Ok(spec),
        _ => Err(meta.error(format!(
            "`{name}` needs a bound, e.g. `{name} = 10` or `{name}(value = 10)`"
        ))),
    }
}

fn parse_pattern(meta: &ParseNestedMeta<'_>) -> syn::Result<ConstraintSpec> {
    if meta.input.peek(Token![=]) {
        let regex: LitStr = meta.value()?.parse()?;
        return Ok(ConstraintSpec::new(Kind::Pattern(Some(regex))));
    }

    let mut spec = ConstraintSpec::new(Kind::Pattern(None));
    parse_options(meta, &mut spec, |key, inner, kind| match key {
        "regex" => {
            *kind = Kind::Pattern(Some(inner.value()?.parse()?));
            Ok(())
        }
        _ => Err(unknown_option(inner, key)),
    })?;

    match &spec.kind {
        Kind::Pattern(Some(_)) => Ok(spec),
        _ => Err(meta.error(
            "`pattern` needs a regex, e.g. `pattern = \"^[a-z]+$\"` or `pattern(regex = \"...\")`",
        )),
    }
}
