//! Message resolution through locales and custom resolvers

use std::fmt::Display;
use veritas::{I18nResolver, Locale, MessageBundle, NoMessages, Validate, Validator, ValidatorConfig};

#[derive(Validate)]
struct Person {
    #[validate(not_null)]
    name: Option<String>,
    #[validate(min = 18)]
    age: i32,
}

fn person() -> Person {
    Person {
        name: None,
        age: 16,
    }
}

#[test]
fn test_french_messages() {
    let validator = Validator::new().with_messages(I18nResolver::with_defaults(Locale::fr()));
    let result = validator.check(&person()).validate();
    assert_eq!(
        result.messages(),
        ["Le champ 'name' est obligatoire", "Le champ 'age' doit être >= 18"]
    );
}

#[test]
fn test_region_falls_back_to_language() {
    let validator = Validator::new().with_messages(I18nResolver::with_defaults(Locale::fr_fr()));
    let result = validator.check(&person()).validate();
    assert_eq!(result.violations()[0].message, "Le champ 'name' est obligatoire");
}

#[test]
fn test_unknown_locale_falls_back_to_english() {
    let validator = Validator::new().with_messages(I18nResolver::with_defaults(Locale::de()));
    let result = validator.check(&person()).validate();
    assert_eq!(result.violations()[1].message, "Field 'age' must be >= 18");
}

#[test]
fn test_bundle_from_json() {
    let resolver = I18nResolver::with_defaults(Locale::es());
    let bundle = MessageBundle::from_json(
        r#"{ "error": { "notNull": "El campo '{0}' es obligatorio" } }"#,
    )
    .unwrap();
    resolver.i18n().add_bundle(&Locale::es(), bundle);

    let validator = Validator::new().with_messages(resolver);
    let result = validator.check(&person()).validate();
    assert_eq!(
        result.messages(),
        ["El campo 'name' es obligatorio", "Field 'age' must be >= 18"]
    );
}

#[test]
fn test_without_catalog_messages_are_synthesized() {
    let validator = Validator::new().with_messages(NoMessages);
    let result = validator.check(&person()).validate();
    assert_eq!(
        result.messages(),
        ["Field 'name' cannot be null", "Field 'age' must be >= 18"]
    );
}

#[test]
fn test_placeholder_from_resolver_is_a_miss() {
    let resolver = |key: &str, _: &[&dyn Display]| Some(format!("??{key}??"));
    let validator = Validator::new().with_messages(resolver);
    let result = validator.check(&person()).validate();
    assert_eq!(result.violations()[0].message, "Field 'name' cannot be null");
}

#[test]
fn test_resolver_receives_field_and_bound() {
    let resolver = |key: &str, args: &[&dyn Display]| {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        Some(format!("{key}[{}]", args.join(",")))
    };
    let validator = Validator::new().with_messages(resolver);
    let result = validator.check(&person()).validate();
    assert_eq!(result.messages(), ["error.notNull[name]", "error.min[age,18]"]);
}

#[test]
fn test_validator_from_config() {
    let config = ValidatorConfig::from_toml_str("locale = \"fr-CA\"").unwrap();
    let validator = Validator::from_config(&config).unwrap();
    let result = validator.check(&person()).validate();
    assert_eq!(result.violations()[0].message, "Le champ 'name' est obligatoire");
}
