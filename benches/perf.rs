use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use sportsdb_terminal::selectors::{build_index, filtered_ids, normalize};
use sportsdb_terminal::state::League;

const SPORTS: &[&str] = &[
    "Soccer",
    "Basketball",
    "Motorsport",
    "American Football",
    "Ice Hockey",
    "Baseball",
];

const NAME_WORDS: &[&str] = &[
    "premier", "national", "liga", "division", "championship", "super", "pro", "united",
    "federation", "cup", "series", "conference",
];

fn synthetic_leagues(count: usize) -> Vec<League> {
    (0..count)
        .map(|i| {
            let first = NAME_WORDS[i % NAME_WORDS.len()];
            let second = NAME_WORDS[(i / NAME_WORDS.len()) % NAME_WORDS.len()];
            League {
                id: format!("{i}"),
                name: format!("{first} {second} league {i}"),
                sport: SPORTS[i % SPORTS.len()].to_string(),
                alternate_name: (i % 3 == 0).then(|| format!("alt {second} {i}")),
            }
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let normalized = normalize(synthetic_leagues(1000));
    c.bench_function("index_build_1000", |b| {
        b.iter(|| {
            black_box(build_index(
                black_box(&normalized.entities),
                black_box(&normalized.order),
            ))
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let normalized = normalize(synthetic_leagues(1000));
    let index = build_index(&normalized.entities, &normalized.order);
    c.bench_function("index_search_substring", |b| {
        b.iter(|| black_box(index.search(black_box("remier"))))
    });
    c.bench_function("index_search_multi_token", |b| {
        b.iter(|| black_box(index.search(black_box("national liga"))))
    });
}

fn bench_filter_pipeline(c: &mut Criterion) {
    let normalized = normalize(synthetic_leagues(1000));
    let index = build_index(&normalized.entities, &normalized.order);
    c.bench_function("filtered_ids_text_and_sport", |b| {
        b.iter(|| {
            black_box(filtered_ids(
                &normalized.order,
                &normalized.entities,
                &index,
                black_box("liga"),
                black_box("Soccer"),
            ))
        })
    });
}

criterion_group!(benches, bench_index_build, bench_search, bench_filter_pipeline);
criterion_main!(benches);
