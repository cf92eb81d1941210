//! Benchmarks for hub lookups.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use infohubs::prelude::*;
use infohubs::testing::{HubFixture, MemoryCatalog, StaticBrain};
use std::sync::Arc;

fn fixture() -> HubFixture {
    let catalog =
        MemoryCatalog::new().with_brain(Arc::new(StaticBrain::new("u1", "/plone/docs/item")));
    HubFixture::new().with_catalog(Arc::new(catalog))
}

fn hub_benchmark(c: &mut Criterion) {
    let fixture = fixture();

    c.bench_function("make_hubs", |b| b.iter(|| black_box(fixture.build())));

    c.bench_function("first_lookup", |b| {
        b.iter(|| {
            let (_, info) = fixture.build();
            black_box(info.get("is_mine").map(|value| value.as_bool()))
        });
    });

    let (_, info) = fixture.build();
    info.get("is_mine").ok();
    c.bench_function("cached_lookup", |b| {
        b.iter(|| black_box(info.get("is_mine").map(|value| value.as_bool())));
    });

    c.bench_function("proxy_cached_lookup", |b| {
        b.iter(|| black_box(info.lookup::<Option<String>>("uid2path", "u1")));
    });
}

fn naming_benchmark(c: &mut Criterion) {
    let config = HubConfig::default();
    let detector = ToolDetector::from_config(&config.tool_detector, ["portal_catalog"]);

    c.bench_function("classify", |b| {
        b.iter(|| {
            black_box(detector.is_tool("portal_membership"));
            black_box(detector.is_tool("folder_contents_view"));
            black_box(detector.is_tool("book"));
        });
    });
}

criterion_group!(benches, hub_benchmark, naming_benchmark);
criterion_main!(benches);
