// Criterion benchmarks for StackUp Match

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stackup_match::core::{apply_filters, send_message, sort_threads, MatchRegistry};
use stackup_match::models::{FilterCriteria, NewProfile, Profile, ProjectIdea, ProjectStage};

const SKILLS: [&str; 6] = ["Rust", "Go", "React", "Python", "Sales", "UX Design"];
const CITIES: [&str; 4] = ["Berlin, DE", "Austin, TX", "New York, NY", "Lisbon, PT"];

fn create_candidate(id: usize) -> Profile {
    NewProfile {
        name: format!("Founder {}", id),
        email: format!("f{}@example.com", id),
        location: CITIES[id % CITIES.len()].to_string(),
        skills: vec![
            SKILLS[id % SKILLS.len()].to_string(),
            SKILLS[(id / 2) % SKILLS.len()].to_string(),
        ],
        interests: vec!["SaaS".to_string()],
        project_ideas: vec![ProjectIdea {
            id: format!("idea-{}", id),
            title: "Idea".to_string(),
            description: String::new(),
            stage: ProjectStage::ALL[id % ProjectStage::ALL.len()],
            tags: vec![],
        }],
        ..Default::default()
    }
    .into_profile(id.to_string())
}

fn create_criteria() -> FilterCriteria {
    FilterCriteria {
        skills: ["Rust", "Go"].iter().map(|s| s.to_string()).collect(),
        interests: Default::default(),
        location: "berlin".to_string(),
        project_stage: [ProjectStage::Mvp, ProjectStage::Growth].into_iter().collect(),
    }
}

fn bench_apply_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_filters");
    let criteria = create_criteria();

    for size in [100usize, 1_000, 10_000] {
        let pool: Vec<Profile> = (0..size).map(create_candidate).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| apply_filters(black_box(pool), black_box(&criteria), Some("0")));
        });
    }

    group.finish();
}

fn bench_sort_threads(c: &mut Criterion) {
    let mut registry = MatchRegistry::new();
    for i in 0..500i64 {
        let peer = format!("peer-{}", i);
        let id = registry
            .like("viewer", &peer, Utc.timestamp_opt(i, 0).unwrap())
            .unwrap()
            .record
            .id;
        if i % 3 != 0 {
            let sent_at = Utc.timestamp_opt(10_000 - i, 0).unwrap();
            send_message(&mut registry, &id, &peer, "hello", sent_at).unwrap();
        }
    }

    c.bench_function("sort_threads_500", |b| {
        b.iter(|| sort_threads(black_box(registry.all()), "viewer"));
    });
}

criterion_group!(benches, bench_apply_filters, bench_sort_threads);
criterion_main!(benches);
