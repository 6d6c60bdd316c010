use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use veritas::*;

#[derive(Validate)]
struct Address {
    #[validate(not_null)]
    street: Option<String>,
    #[validate(pattern = "[0-9]{5}")]
    zip: String,
}

#[derive(Validate)]
struct Customer {
    #[validate(not_null)]
    name: Option<String>,
    #[validate(email)]
    email: String,
    #[validate(size(min = 8, max = 20))]
    password: String,
    #[validate(min = 18, max = 120)]
    age: u32,
    #[validate(not_null)]
    addresses: Vec<Address>,
}

fn customer(valid: bool) -> Customer {
    let address = |street: Option<&str>, zip: &str| Address {
        street: street.map(str::to_string),
        zip: zip.to_string(),
    };

    if valid {
        Customer {
            name: Some("Daniel".into()),
            email: "daniel@example.com".into(),
            password: "longEnoughPassword".into(),
            age: 30,
            addresses: vec![address(Some("Main St"), "12345"), address(Some("High St"), "54321")],
        }
    } else {
        Customer {
            name: None,
            email: "invalidEmail".into(),
            password: "short".into(),
            age: 12,
            addresses: vec![address(None, "123"), address(Some("High St"), "abcde")],
        }
    }
}

fn bench_metadata_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata_validation");
    let validator = Validator::new();
    let valid = customer(true);
    let invalid = customer(false);

    group.bench_function("valid_customer", |b| {
        b.iter(|| validator.accumulate_validate(black_box(&valid)))
    });

    group.bench_function("invalid_customer", |b| {
        b.iter(|| validator.accumulate_validate(black_box(&invalid)))
    });

    group.bench_function("invalid_customer_no_catalog", |b| {
        let validator = Validator::new().with_messages(NoMessages);
        b.iter(|| validator.accumulate_validate(black_box(&invalid)))
    });

    group.finish();
}

fn bench_metadata_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata_cache");
    let valid = customer(true);

    group.bench_function("cached_lookup", |b| {
        let cache = MetadataCache::new();
        cache.get(&valid);
        b.iter(|| cache.get(black_box(&valid)))
    });

    group.bench_function("cold_scan", |b| {
        b.iter(|| {
            let cache = MetadataCache::new();
            cache.get(black_box(&valid))
        })
    });

    group.finish();
}

fn bench_fluent_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("fluent_builder");
    let validator = Validator::new();
    validator.rules().register_rule(
        "strongPassword",
        RuleBuilder::new()
            .length_at_least(12)
            .matches(".*[0-9].*")
            .expect("valid regex")
            .build(),
    );
    let invalid = customer(false);

    group.bench_function("fluent_only", |b| {
        b.iter(|| {
            validator
                .check(black_box(&invalid))
                .skip_metadata()
                .is_not_null("name", "")
                .is_email("email", "")
                .has_length_between("password", 8, 20, "")
                .validate()
        })
    });

    group.bench_function("metadata_and_rules", |b| {
        b.iter(|| {
            validator
                .check(black_box(&invalid))
                .apply_rule("strongPassword", "password", "")
                .matches_regex("email", ".+@.+", "")
                .validate()
        })
    });

    group.finish();
}

fn bench_email_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("email_policies");
    let emails = [
        "user@example.com",
        "test.user+tag@domain.co.uk",
        "invalid-email",
        "@example.com",
    ];

    for (name, policy) in [("pragmatic", EmailPolicy::Pragmatic), ("strict", EmailPolicy::strict())] {
        group.bench_function(name, |b| {
            b.iter(|| {
                for email in &emails {
                    black_box(policy.accepts(None, black_box(email)));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_metadata_validation,
    bench_metadata_cache,
    bench_fluent_builder,
    bench_email_policies,
);

criterion_main!(validation_benches);
