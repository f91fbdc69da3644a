use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use chrono::Utc;
use mimix_auth::{Operation, Role, TokenIssuer, is_allowed};
use mimix_core::IdentityId;

fn bench_token_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity_tokens");
    let issuer = TokenIssuer::new(b"bench-secret");
    let identity = IdentityId::new();

    group.bench_function("issue", |b| {
        b.iter(|| black_box(issuer.issue(identity, Utc::now()).unwrap()));
    });

    let now = Utc::now();
    let token = issuer.issue(identity, now).unwrap();
    group.bench_function("validate", |b| {
        b.iter(|| black_box(issuer.validate(black_box(&token), now).unwrap()));
    });

    let forged = TokenIssuer::new(b"other-secret").issue(identity, now).unwrap();
    group.bench_function("reject_bad_signature", |b| {
        b.iter(|| black_box(issuer.validate(black_box(&forged), now).is_err()));
    });

    group.finish();
}

fn bench_policy_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_lookup");

    for role in Role::ALL {
        group.bench_with_input(BenchmarkId::new("all_operations", role), &role, |b, &role| {
            b.iter(|| {
                Operation::ALL
                    .into_iter()
                    .filter(|op| is_allowed(black_box(role), *op))
                    .count()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_token_round_trip, bench_policy_lookup);
criterion_main!(benches);
