use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use referent_core::{Document, ExtractConfig, extract_article, extract_content, normalize_whitespace};

fn large_page() -> String {
    let article = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let paragraph = "<p>Lorem ipsum dolor sit amet,   consectetur\n adipiscing elit.</p>".repeat(2000);
    article.replace("</article>", &format!("{}</article>", paragraph))
}

fn bench_parse(c: &mut Criterion) {
    let small = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let large = large_page();

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("small", "3KB"), &small, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("large", "150KB"), &large, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.finish();
}

fn bench_full_extraction(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();

    c.bench_function("full_extraction", |b| b.iter(|| extract_article(black_box(&html))));
}

fn bench_content_rules(c: &mut Criterion) {
    let doc = Document::parse(&large_page());
    let config = ExtractConfig::default();

    c.bench_function("content_rules", |b| b.iter(|| extract_content(black_box(&doc), black_box(&config))));
}

fn bench_normalize(c: &mut Criterion) {
    let text = "word \n\t  ".repeat(10_000);

    c.bench_function("normalize_whitespace", |b| b.iter(|| normalize_whitespace(black_box(&text))));
}

criterion_group!(benches, bench_parse, bench_full_extraction, bench_content_rules, bench_normalize);
criterion_main!(benches);
