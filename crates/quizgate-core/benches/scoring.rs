use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgate_core::model::{AssessmentDefinition, AttemptRecord, Question, UserContext};
use quizgate_core::report::AttemptSummary;
use quizgate_core::runner::AssessmentRunner;
use quizgate_core::scoring::{percentage, ScoringMode};
use quizgate_core::store::AttemptStore;
use quizgate_core::traits::CollectionStore;

#[derive(Default)]
struct BenchStore(Mutex<HashMap<String, Vec<serde_json::Value>>>);

impl CollectionStore for BenchStore {
    fn load_collection(&self, key: &str) -> quizgate_core::Result<Vec<serde_json::Value>> {
        Ok(self.0.lock().unwrap().get(key).cloned().unwrap_or_default())
    }
    fn save_collection(&self, key: &str, items: &[serde_json::Value]) -> quizgate_core::Result<()> {
        self.0.lock().unwrap().insert(key.to_string(), items.to_vec());
        Ok(())
    }
}

fn make_assessment(n: usize) -> Arc<AssessmentDefinition> {
    let questions = (0..n)
        .map(|i| {
            Question::new(
                format!("question {i}"),
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                i % 4,
            )
            .unwrap()
        })
        .collect();
    Arc::new(AssessmentDefinition::new("bench", "Bench", questions))
}

fn user() -> UserContext {
    UserContext {
        id: "u_bench".into(),
        name: "Bench".into(),
    }
}

fn bench_percentage(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentage");

    group.bench_function("1/3", |b| {
        b.iter(|| percentage(black_box(1), black_box(3)))
    });

    group.bench_function("empty", |b| {
        b.iter(|| percentage(black_box(0), black_box(0)))
    });

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("runner");

    for (name, mode) in [
        ("cumulative_50", ScoringMode::Cumulative),
        ("last_answer_50", ScoringMode::LastAnswer),
    ] {
        let definition = make_assessment(50);
        group.bench_function(name, |b| {
            b.iter(|| {
                let store = AttemptStore::new(Arc::new(BenchStore::default()));
                let mut runner =
                    AssessmentRunner::new(Arc::clone(&definition), user(), store, mode).unwrap();
                for i in 0..50 {
                    runner.select_option(i % 4).unwrap();
                    runner.next().unwrap();
                }
                black_box(runner.record().map(|r| r.score))
            })
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let definitions: Vec<_> = (0..10)
        .map(|i| AssessmentDefinition::new(format!("a{i}"), format!("Assessment {i}"), vec![]))
        .collect();
    let records: Vec<AttemptRecord> = (0..1000)
        .map(|i| AttemptRecord::new(&definitions[i % 10], &user(), (i % 101) as u8))
        .collect();

    c.bench_function("summary_1000", |b| {
        b.iter(|| AttemptSummary::compute(black_box(&records), 50))
    });
}

criterion_group!(benches, bench_percentage, bench_full_run, bench_summary);
criterion_main!(benches);
