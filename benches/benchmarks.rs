// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Two hot paths:
//   1. Scoring — one persona against one analyzed task, and a whole catalog
//   2. Selection — the full select_persona pipeline over catalogs of growing size

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use persona_dispatch::context::ContextIntegrator;
use persona_dispatch::core::analyzer::TaskAnalyzer;
use persona_dispatch::core::classifier::TaskClassifier;
use persona_dispatch::core::scorer::PersonaScorer;
use persona_dispatch::core::Dispatcher;
use persona_dispatch::infra::config::DispatcherConfig;
use persona_dispatch::persona::manager::default_personas;
use persona_dispatch::persona::{MemoryStore, Persona};

const TASK: &str = "Review the Python API design and debug the database layer before deployment";

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Default personas plus `extra` synthetic ones.
fn catalog(extra: usize) -> Vec<Persona> {
    let mut personas = default_personas();
    for i in 0..extra {
        personas.push(
            Persona::new(
                format!("synthetic_{i:04}"),
                format!("Specialist {i}"),
                format!("Handles topic {} in depth", i % 37),
            )
            .with_expertise([format!("Topic {}", i % 37), "Research".to_string()])
            .with_style("Professional and clear")
            .with_context("Use for specialist questions")
            .with_traits(["precise", "thorough"]),
        );
    }
    personas
}

fn dispatcher(extra: usize) -> Dispatcher {
    let config = DispatcherConfig {
        auto_generation: false,
        ..Default::default()
    };
    Dispatcher::new(
        Arc::new(MemoryStore::with_personas(catalog(extra))),
        ContextIntegrator::disabled(),
        &config,
    )
    .expect("valid config")
}

// ─── 1. Scoring ─────────────────────────────────────────────────────────────

fn bench_scoring(c: &mut Criterion) {
    let task = TaskAnalyzer::new().analyze(TASK, "");
    let category = TaskClassifier::new().classify(&task);
    let scorer = PersonaScorer::new();
    let personas = catalog(100);

    let mut group = c.benchmark_group("scoring");

    group.bench_function("score_one", |b| {
        b.iter(|| scorer.score(black_box(&personas[0]), black_box(&task), category))
    });

    group.bench_function("score_catalog_104", |b| {
        b.iter(|| {
            personas
                .iter()
                .map(|p| scorer.score(p, &task, category).0)
                .fold(0.0f64, f64::max)
        })
    });

    group.bench_function("analyze_and_classify", |b| {
        let analyzer = TaskAnalyzer::new();
        let classifier = TaskClassifier::new();
        b.iter(|| classifier.classify(&analyzer.analyze(black_box(TASK), "")))
    });

    group.finish();
}

// ─── 2. Full selection ──────────────────────────────────────────────────────

fn bench_selection(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("select_persona");

    for extra in [0usize, 100, 1000] {
        let d = dispatcher(extra);
        group.bench_with_input(BenchmarkId::from_parameter(extra + 4), &d, |b, d| {
            b.iter(|| {
                rt.block_on(d.select_persona(black_box(TASK), "", None))
                    .expect("non-empty catalog")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_selection);
criterion_main!(benches);
