//! Shared validator state under concurrent use

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use veritas::{
    Constraint, FieldDescriptor, MetadataCache, Reflect, TypeMetadata, Validatable, Validate,
    Validator,
};

static DESCRIBE_CALLS: AtomicUsize = AtomicUsize::new(0);

struct Counted {
    name: Option<String>,
}

impl Validatable for Counted {
    fn describe() -> TypeMetadata {
        DESCRIBE_CALLS.fetch_add(1, Ordering::SeqCst);
        TypeMetadata::of::<Self>().field(
            FieldDescriptor::new("name", |target| {
                target.downcast_ref::<Counted>().map(|c| c.name.reflect())
            }),
            vec![Constraint::not_null()],
        )
    }
}

#[test]
fn test_concurrent_first_use_scans_once() {
    let validator = Validator::new();
    let target = Counted { name: None };

    thread::scope(|scope| {
        for _ in 0..16 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let result = validator.accumulate_validate(&target);
                    assert_eq!(result.len(), 1);
                }
            });
        }
    });

    assert_eq!(validator.cache().scan_count(), 1);
    assert_eq!(DESCRIBE_CALLS.load(Ordering::SeqCst), 1);
}

#[derive(Validate)]
struct Message {
    #[validate(size(min = 1, max = 5))]
    body: String,
}

#[test]
fn test_clones_share_one_cache() {
    let validator = Validator::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let validator = validator.clone();
            thread::spawn(move || {
                let message = Message {
                    body: "x".repeat(i),
                };
                validator.check(&message).validate().len()
            })
        })
        .collect();

    let failures: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    // bodies of length 0, 6 and 7 fail
    assert_eq!(failures, 3);
    assert_eq!(validator.cache().scan_count(), 1);
}

#[test]
fn test_separate_caches_are_independent() {
    let shared = Arc::new(MetadataCache::new());
    let a = Validator::new().with_cache(Arc::clone(&shared));
    let b = Validator::new().with_cache(Arc::clone(&shared));
    let c = Validator::new();

    let message = Message { body: "hi".into() };
    a.check(&message).validate();
    b.check(&message).validate();
    c.check(&message).validate();

    assert_eq!(shared.scan_count(), 1);
    assert_eq!(c.cache().scan_count(), 1);
}

#[test]
fn test_rules_registered_while_validating() {
    let validator = Validator::new();
    let message = Message { body: "hey".into() };

    thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..100 {
                validator
                    .rules()
                    .register(format!("rule-{i}"), |v| v.as_text().is_some());
            }
        });
        scope.spawn(|| {
            for _ in 0..100 {
                let result = validator
                    .check(&message)
                    .apply_rule("rule-0", "body", "")
                    .validate();
                // either not registered yet or passing
                assert!(result.len() <= 1);
            }
        });
    });

    assert_eq!(validator.rules().len(), 100);
}
