use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::sync::Arc;

use cobalt_di::{Resolver, ServiceCollection};

struct Settings {
    retries: u32,
}

struct Pool {
    settings: Arc<Settings>,
    capacity: usize,
}

struct Session {
    pool: Arc<Pool>,
}

trait Codec: Send + Sync {
    fn tag(&self) -> u32;
}

struct JsonCodec(u32);
impl Codec for JsonCodec {
    fn tag(&self) -> u32 {
        self.0
    }
}

fn wired_collection() -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services.add_singleton(Settings { retries: 3 });
    services.add_singleton_factory::<Pool, _>(|r| Pool {
        settings: r.get_required::<Settings>().unwrap(),
        capacity: 8,
    });
    services.add_scoped_factory::<Session, _>(|r| Session {
        pool: r.get_required::<Pool>().unwrap(),
    });
    services
}

fn lookup_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let provider = wired_collection().build();
    let _ = provider.get::<Pool>();

    group.bench_function("singleton_warm", |b| {
        b.iter(|| black_box(provider.get_required::<Pool>().unwrap().capacity))
    });

    let scope = provider.create_scope();
    let _ = scope.get::<Session>();

    group.bench_function("scoped_warm", |b| {
        b.iter(|| black_box(scope.get_required::<Session>().unwrap().pool.capacity))
    });

    let mut services = ServiceCollection::new();
    services.add_singleton(Settings { retries: 3 });
    services.add_transient_factory::<Pool, _>(|r| Pool {
        settings: r.get_required::<Settings>().unwrap(),
        capacity: 8,
    });
    let transient_provider = services.build();

    group.bench_function("transient", |b| {
        b.iter(|| black_box(transient_provider.get_required::<Pool>().unwrap().settings.retries))
    });

    group.finish();
}

fn first_resolution(c: &mut Criterion) {
    c.bench_function("build_and_first_resolve", |b| {
        b.iter_batched(
            || wired_collection().build(),
            |provider| black_box(provider.get_required::<Pool>().unwrap().capacity),
            BatchSize::SmallInput,
        )
    });
}

fn trait_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("trait_lookup");

    let mut services = ServiceCollection::new();
    services.add_singleton_trait::<dyn Codec>(Arc::new(JsonCodec(1)));
    let provider = services.build();

    group.bench_function("single", |b| {
        b.iter(|| black_box(provider.get_required_trait::<dyn Codec>().unwrap().tag()))
    });

    for &bindings in &[2usize, 8, 32] {
        let mut services = ServiceCollection::new();
        for i in 0..bindings as u32 {
            services.add_singleton_trait::<dyn Codec>(Arc::new(JsonCodec(i)));
        }
        let provider = services.build();
        let _ = provider.get_all_trait::<dyn Codec>().unwrap();

        group.bench_with_input(
            BenchmarkId::new("get_all", bindings),
            &bindings,
            |b, &expected| {
                b.iter(|| {
                    let codecs = provider.get_all_trait::<dyn Codec>().unwrap();
                    assert_eq!(codecs.len(), expected);
                    black_box(codecs);
                })
            },
        );
    }

    group.finish();
}

fn scope_churn(c: &mut Criterion) {
    let provider = wired_collection().build();
    let _ = provider.get::<Pool>();

    // One request's worth of work: open a scope, resolve, tear it down.
    c.bench_function("scope_open_resolve_drop", |b| {
        b.iter(|| {
            let scope = provider.create_scope();
            black_box(scope.get_required::<Session>().unwrap().pool.capacity);
        })
    });
}

fn transient_chain(c: &mut Criterion) {
    struct L0;
    struct L1 { _up: Arc<L0> }
    struct L2 { _up: Arc<L1> }
    struct L3 { _up: Arc<L2> }

    let mut services = ServiceCollection::new();
    services.add_singleton(L0);
    services.add_transient_factory::<L1, _>(|r| L1 { _up: r.get_required().unwrap() });
    services.add_transient_factory::<L2, _>(|r| L2 { _up: r.get_required().unwrap() });
    services.add_transient_factory::<L3, _>(|r| L3 { _up: r.get_required().unwrap() });
    let provider = services.build();

    c.bench_function("transient_chain_depth_4", |b| {
        b.iter(|| black_box(provider.get_required::<L3>().unwrap()))
    });
}

fn warm_singleton_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let provider = wired_collection().build();
    let _ = provider.get::<Pool>();

    for &threads in &[2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("readers", threads),
            &threads,
            |b, &threads| {
                // Fixed batch of lookups split across the readers; the warm
                // path takes no table lock so this measures slot-read cost.
                b.iter(|| {
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let provider = provider.clone();
                            s.spawn(move |_| {
                                for _ in 0..256 {
                                    black_box(provider.get_required::<Pool>().unwrap());
                                }
                            });
                        }
                    })
                    .unwrap();
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    lookup_paths,
    first_resolution,
    trait_lookup,
    scope_churn,
    transient_chain,
    warm_singleton_contention
);
criterion_main!(benches);
