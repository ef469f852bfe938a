use std::collections::BTreeSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizr::corpus::{Corpus, Difficulty, QuestionRecord};
use quizr::engine::scoring;
use quizr::engine::selector::{CountSpec, DifficultyFilter, select};

const TAGS: [&str; 6] = ["sleep", "nutrition", "exercise", "hydration", "mind", "misc"];

fn make_corpus(count: usize) -> Corpus {
    let difficulties = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    let questions = (0..count)
        .map(|i| QuestionRecord {
            id: format!("q{i}"),
            prompt: format!("Question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: i % 4,
            categories: vec![
                TAGS[i % TAGS.len()].to_string(),
                TAGS[(i / 7) % TAGS.len()].to_string(),
            ],
            difficulty: difficulties[i % 3],
            explanation: None,
        })
        .collect();
    Corpus::new(questions).unwrap_or_default()
}

fn bench_select(c: &mut Criterion) {
    let corpus = make_corpus(10_000);
    let categories = vec!["sleep".to_string(), "mind".to_string()];
    let no_flags = BTreeSet::new();
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("select 20 of 10k (two categories, medium-hard)", |b| {
        b.iter(|| {
            select(
                black_box(&corpus),
                black_box(&categories),
                DifficultyFilter::MediumHard,
                CountSpec::Limit(20),
                &no_flags,
                &mut rng,
            )
        })
    });

    c.bench_function("select all of 10k (two categories)", |b| {
        b.iter(|| {
            select(
                black_box(&corpus),
                black_box(&categories),
                DifficultyFilter::All,
                CountSpec::All,
                &no_flags,
                &mut rng,
            )
        })
    });

    let flagged: BTreeSet<String> = (0..10_000).step_by(50).map(|i| format!("q{i}")).collect();
    c.bench_function("select flagged (200 of 10k)", |b| {
        b.iter(|| {
            select(
                black_box(&corpus),
                black_box(&categories),
                DifficultyFilter::All,
                CountSpec::Flagged,
                black_box(&flagged),
                &mut rng,
            )
        })
    });
}

fn bench_grade(c: &mut Criterion) {
    c.bench_function("percentage + grade (0..=50 of 50)", |b| {
        b.iter(|| {
            for correct in 0..=50 {
                black_box(scoring::grade(scoring::percentage(black_box(correct), 50)));
            }
        })
    });
}

criterion_group!(benches, bench_select, bench_grade);
criterion_main!(benches);
