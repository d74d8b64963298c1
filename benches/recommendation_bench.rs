use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reelrec::*;

fn synthetic_store(users: u32, items: u32) -> RatingStore {
    let mut ratings = Vec::new();
    for user in 0..users {
        for item in 0..items {
            if (user + item) % 3 == 0 {
                continue;
            }
            let value = 0.5 + ((user * 7 + item * 13) % 10) as f32 * 0.5;
            ratings.push(Rating::new(
                user + 1,
                item + 1,
                value,
                (user as i64) * 10_000 + item as i64,
            ));
        }
    }
    RatingStore::from_ratings(ratings).unwrap()
}

fn synthetic_titles(count: usize) -> Vec<String> {
    let stems = [
        "story", "empire", "return", "finding", "city", "night", "king", "garden", "river",
        "winter",
    ];
    (0..count)
        .map(|i| {
            format!(
                "The {} of the {} {}",
                stems[i % stems.len()],
                stems[(i / stems.len()) % stems.len()],
                i
            )
        })
        .collect()
}

fn benchmark_cosine_engine(c: &mut Criterion) {
    let store = synthetic_store(200, 100);

    c.bench_function("cosine_engine_build", |b| {
        b.iter(|| black_box(CosineEngine::build(&store, 20)));
    });

    let engine = CosineEngine::build(&store, 20);
    c.bench_function("cosine_engine_recommend", |b| {
        b.iter(|| black_box(engine.recommend(black_box(42))));
    });
}

fn benchmark_path_engine(c: &mut Criterion) {
    let store = synthetic_store(200, 100);

    c.bench_function("path_engine_build", |b| {
        b.iter(|| black_box(PathEngine::build(&store, 20)));
    });

    let engine = PathEngine::build(&store, 20);
    c.bench_function("path_engine_recommend", |b| {
        b.iter(|| black_box(engine.recommend(black_box(42))));
    });
}

fn benchmark_text_index(c: &mut Criterion) {
    let corpus = synthetic_titles(2_000);

    c.bench_function("text_index_fit", |b| {
        b.iter(|| {
            black_box(
                TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(1, 1), 0.28).unwrap(),
            )
        });
    });

    let index = TextIndex::fit(&corpus, Analyzer::Word, NgramRange::new(1, 1), 0.28).unwrap();
    c.bench_function("text_index_search", |b| {
        b.iter(|| black_box(index.search(black_box("winter story"))));
    });
}

criterion_group!(
    benches,
    benchmark_cosine_engine,
    benchmark_path_engine,
    benchmark_text_index
);
criterion_main!(benches);
