//! Benchmarks for the Omni engine.
//!
//! Run with: cargo bench -p omni-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use omni_core::config::TemplateSelection;
use omni_core::engine::{DescriptionGenerator, QuestionAnswerer};
use omni_core::{intent, Config, Engine, Label};

fn sample_labels() -> Vec<Label> {
    vec![
        Label::new("tabby_cat", 0.82),
        Label::new("studio_couch", 0.31),
        Label::new("quilt", 0.12),
        Label::new("pillow", 0.07),
    ]
}

fn benchmark_describe(c: &mut Criterion) {
    let labels = sample_labels();
    let random = DescriptionGenerator::new(TemplateSelection::Random);
    let seeded = DescriptionGenerator::new(TemplateSelection::Seeded);

    c.bench_function("describe_random", |b| {
        b.iter(|| random.describe(black_box(&labels)))
    });
    c.bench_function("describe_seeded", |b| {
        b.iter(|| seeded.describe(black_box(&labels)))
    });
}

fn benchmark_classify(c: &mut Criterion) {
    c.bench_function("classify_intent", |b| {
        b.iter(|| intent::classify(black_box("Can you see a dog near the couch?")))
    });
}

fn benchmark_answer_uncached(c: &mut Criterion) {
    let labels = sample_labels();
    let answerer = QuestionAnswerer::new();

    c.bench_function("answer_uncached", |b| {
        b.iter(|| answerer.answer(black_box(&labels), black_box("Is there a pillow?")))
    });
}

fn benchmark_answer_cached(c: &mut Criterion) {
    let labels = sample_labels();
    let engine = Engine::new(&Config::default());
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("answer_cached", |b| {
        b.iter(|| rt.block_on(engine.answer(black_box(&labels), "What animal is this?")))
    });
}

criterion_group!(
    benches,
    benchmark_describe,
    benchmark_classify,
    benchmark_answer_uncached,
    benchmark_answer_cached,
);
criterion_main!(benches);
