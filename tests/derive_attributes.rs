//! `#[derive(Validate)]` attribute forms

use veritas::{ConstraintKind, Validatable, Validate, Validator};

struct Session;

#[derive(Validate)]
struct Profile {
    #[validate(not_null(message = "handle is required"))]
    handle: Option<String>,
    #[validate(min = 18, max(value = 120, message = "nobody is that old"))]
    age: u8,
    #[validate(min(value = -10), max = 10)]
    offset: i32,
    #[validate(pattern = "[a-z]{2}-[A-Z]{2}")]
    locale: String,
    #[validate(pattern(regex = "[0-9]+", message_key = "error.digits"))]
    zip: String,
    #[validate(email(regex = r"[a-z]+@corp\.example"))]
    work_email: String,
    #[validate(size(max = 3))]
    #[validate(not_null)]
    initials: Option<String>,
    #[validate(skip)]
    session: Session,
    r#type: String,
}

fn valid_profile() -> Profile {
    Profile {
        handle: Some("ann".into()),
        age: 30,
        offset: 0,
        locale: "en-US".into(),
        zip: "12345".into(),
        work_email: "ann@corp.example".into(),
        initials: Some("AB".into()),
        session: Session,
        r#type: "admin".into(),
    }
}

#[test]
fn test_describe_lists_fields_in_order() {
    let metadata = Profile::describe();
    let names: Vec<_> = metadata.fields().iter().map(|f| f.name()).collect();
    assert_eq!(
        names,
        ["handle", "age", "offset", "locale", "zip", "work_email", "initials", "type"]
    );

    let initials = metadata.get("initials").unwrap();
    let kinds: Vec<_> = initials.constraints().iter().map(|c| c.code()).collect();
    assert_eq!(kinds, ["size", "notNull"]);
    assert!(matches!(
        initials.constraints()[0].kind(),
        ConstraintKind::Size { min: 0, max: 3 }
    ));

    assert!(metadata.get("session").is_none());
    assert!(metadata.get("type").unwrap().constraints().is_empty());
}

#[test]
fn test_valid_profile() {
    let validator = Validator::new();
    let profile = valid_profile();
    assert!(validator.check(&profile).validate().is_valid());
}

#[test]
fn test_messages_and_bounds() {
    let validator = Validator::new();
    let profile = Profile {
        handle: None,
        age: 121,
        offset: -11,
        locale: "en_US".into(),
        zip: "12a".into(),
        work_email: "ann@example.com".into(),
        initials: Some("ABCD".into()),
        ..valid_profile()
    };

    let result = validator.check(&profile).validate();
    let messages = result.messages();

    assert_eq!(
        messages,
        [
            "handle is required",
            "nobody is that old",
            "Field 'offset' must be >= -10",
            "Field 'locale' does not match the required pattern",
            "Field 'zip' must match regex '[0-9]+'",
            "Field 'work_email' has an invalid email format",
            "Field 'initials' has an invalid length",
        ]
    );
}

#[test]
fn test_min_only_applies_lower_bound() {
    let validator = Validator::new();
    let young = Profile {
        age: 17,
        ..valid_profile()
    };
    let result = validator.check(&young).validate();
    assert_eq!(result.messages(), ["Field 'age' must be >= 18"]);
    assert_eq!(result.violations()[0].value.as_deref(), Some("17"));
}

#[test]
fn test_tuple_struct() {
    #[derive(Validate)]
    struct Code(#[validate(size(min = 2, max = 4))] String, #[validate(min = 1)] u32);

    let validator = Validator::new();
    let result = validator.check(&Code("x".into(), 0)).validate();
    let fields: Vec<_> = result.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, ["0", "1"]);
}

#[test]
fn test_generic_struct() {
    #[derive(Validate)]
    struct Wrapper<T: veritas::Reflect> {
        #[validate(not_null)]
        inner: Option<T>,
    }

    let validator = Validator::new();
    assert_eq!(
        validator
            .check(&Wrapper::<u32> { inner: None })
            .validate()
            .len(),
        1
    );
    assert!(
        validator
            .check(&Wrapper::<String> {
                inner: Some("x".into())
            })
            .validate()
            .is_valid()
    );
    // one cache entry per instantiation
    assert_eq!(validator.cache().len(), 2);
}
