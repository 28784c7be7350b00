//! Benchmarks for search passes and highlight clearing.

use apiref::dom::parse_html;
use apiref::page::Page;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn fixture_page() -> Page {
    let html = include_str!("../tests/fixtures/reference.html");
    let mut page = Page::attach(parse_html(html).unwrap());
    page.show_default_sections();
    page
}

fn bench_search_pass(c: &mut Criterion) {
    let page = fixture_page();
    c.bench_function("search_video", |b| {
        b.iter_batched(
            || page.clone(),
            |mut page| page.apply_query(black_box("video")),
            BatchSize::SmallInput,
        )
    });
}

fn bench_search_then_reset(c: &mut Criterion) {
    let page = fixture_page();
    c.bench_function("search_then_reset", |b| {
        b.iter_batched(
            || page.clone(),
            |mut page| {
                page.apply_query(black_box("playlist"));
                page.apply_query(black_box(""));
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_search_pass, bench_search_then_reset);
criterion_main!(benches);
