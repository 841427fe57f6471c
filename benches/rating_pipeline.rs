use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dx_rating_processor::{
    database::reference_index::ReferenceIndex,
    model::{pipeline::RatingProcessor, selector::SelectionLimits},
    render::Presenter,
    utils::test_utils::{generate_random_enriched_records, generate_random_raw_records, generate_random_reference_table}
};

const SONGS: usize = 1_500;

pub fn criterion_benchmark(c: &mut Criterion) {
    let table = generate_random_reference_table(SONGS, 1);
    c.bench_function("build_reference_index", |b| b.iter(|| ReferenceIndex::build(&table)));

    let index = ReferenceIndex::build(&table);
    let processor = RatingProcessor::default();
    let mut group = c.benchmark_group("process");
    for n in [100, 1_000, 10_000] {
        let records = generate_random_raw_records(n, SONGS, 2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| processor.process(records, &index))
        });
    }
    group.finish();

    let enriched = generate_random_enriched_records(10_000, 3);
    c.bench_function("select_10000", |b| {
        b.iter(|| SelectionLimits::default().select(enriched.clone()))
    });

    let selection = SelectionLimits::default().select(enriched);
    let presenter = Presenter::default();
    c.bench_function("render_svg", |b| b.iter(|| presenter.render_svg(&selection, &HashMap::new())));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
