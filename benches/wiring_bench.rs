//! Benchmarks for assembly, product resolution and wiring

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use wiring_factory::{
    derive_name, factory_support, resolve_product, Autowired, ContainerBuilder, Resolver,
    ResolverExt, Result, TypeArg, TypeDescriptor, TypeKey, Wireable, WiringBridge, WiringFactory,
    WiringFactorySupport,
};

#[allow(dead_code)]
struct Config {
    retries: u32,
}

#[allow(dead_code)]
struct Metrics {
    name: String,
}

struct Job {
    config: Autowired<Config>,
    metrics: Autowired<Metrics>,
    id: u64,
}

impl Job {
    fn new(id: u64) -> Self {
        Self {
            config: Autowired::new(),
            metrics: Autowired::new(),
            id,
        }
    }
}

impl Wireable for Job {
    fn inject(&mut self, resolver: &dyn Resolver) -> Result<()> {
        self.config.inject(resolver.resolve_for_field("config")?);
        self.metrics.inject(resolver.resolve::<Metrics>()?);
        Ok(())
    }
}

struct JobFactory {
    support: WiringFactorySupport<Job>,
}

impl WiringFactory for JobFactory {
    type Product = Job;

    fn bridge(&self) -> &WiringBridge {
        self.support.bridge()
    }
}

fn builder_with_factory() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder
        .singleton("config", Config { retries: 3 })
        .unwrap()
        .singleton("metrics", Metrics { name: "jobs".into() })
        .unwrap()
        .factory("jobFactory", |c| {
            Ok(JobFactory {
                support: WiringFactorySupport::from_container(c),
            })
        })
        .unwrap();
    builder
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    group.bench_function("build_with_factory", |b| {
        b.iter(|| black_box(builder_with_factory().build().unwrap()))
    });

    group.bench_function("build_without_scan", |b| {
        b.iter(|| {
            let mut builder = ContainerBuilder::with_options(
                wiring_factory::AssemblyOptions::new().scan_factories(false),
            );
            builder
                .singleton("config", Config { retries: 3 })
                .unwrap();
            black_box(builder.build().unwrap())
        })
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_resolution");

    let direct = TypeDescriptor::of_factory::<JobFactory>();
    let mut deep = TypeDescriptor::generic("bench::Level0")
        .param("T")
        .extends(factory_support(), [TypeArg::var("T")])
        .build();
    for level in 1..8 {
        deep = TypeDescriptor::generic(format!("bench::Level{level}"))
            .param("U")
            .extends(&deep, [TypeArg::var("U")])
            .build();
    }
    let deep = TypeDescriptor::generic("bench::Leaf")
        .extends(&deep, [TypeArg::of::<Job>()])
        .build();

    group.bench_function("direct", |b| {
        b.iter(|| black_box(resolve_product(black_box(&direct)).unwrap()))
    });

    group.bench_function("eight_levels", |b| {
        b.iter(|| black_box(resolve_product(black_box(&deep)).unwrap()))
    });

    group.bench_function("derive_name", |b| {
        let key = TypeKey::of::<JobFactory>();
        b.iter(|| black_box(derive_name(black_box(&key))))
    });

    group.finish();
}

fn bench_wiring(c: &mut Criterion) {
    let mut group = c.benchmark_group("wiring");
    group.throughput(Throughput::Elements(1));

    let container = builder_with_factory().build().unwrap();
    let factory = container.get::<JobFactory>().unwrap();

    group.bench_function("wire_two_slots", |b| {
        let mut id = 0;
        b.iter(|| {
            id += 1;
            black_box(factory.wire(Job::new(id)).unwrap().id)
        })
    });

    group.bench_function("get_singleton", |b| {
        b.iter(|| black_box(container.get::<Config>().unwrap()))
    });

    group.bench_function("get_named", |b| {
        b.iter(|| black_box(container.get_named::<Metrics>("metrics").unwrap()))
    });

    group.finish();
}

fn bench_concurrent_wiring(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    let container = builder_with_factory().build().unwrap();
    let factory = container.get::<JobFactory>().unwrap();

    group.bench_function("wire_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let factory = Arc::clone(&factory);
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            black_box(factory.wire(Job::new(t * 100 + i)).unwrap());
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_assembly,
    bench_resolution,
    bench_wiring,
    bench_concurrent_wiring
);
criterion_main!(benches);
