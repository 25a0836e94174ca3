use std::time::Instant;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use gym_core::{PageController, WatchConfig};
use gym_proto::{GymRecord, GymsResponse, TeamId};

fn batch(size: usize, timestamp: i64, shift: i64) -> GymsResponse {
    let gyms = (0..size)
        .map(|index| GymRecord {
            id: format!("gym-{index}"),
            name: format!("Gym {index}"),
            team_id: TeamId((index as i64 + shift) % 4),
            level: None,
            gym_points: 1000 + shift * 500 * (index as i64 % 3),
            members_count: 1 + index as i64 % 6,
            latitude: 42.87 + index as f64 * 1e-4,
            longitude: -8.54 - index as f64 * 1e-4,
        })
        .collect();
    GymsResponse { timestamp, gyms }
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for size in [64usize, 256, 1024, 4096] {
        let baseline = batch(size, 100, 0);
        let update = batch(size, 105, 1);
        group.bench_with_input(BenchmarkId::new("gyms", size), &size, |b, _| {
            b.iter_batched(
                || {
                    let mut page = PageController::new(&WatchConfig::default());
                    page.apply(&baseline, Instant::now());
                    page
                },
                |mut page| page.apply(&update, Instant::now()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(narrate_benches, bench_apply);
criterion_main!(narrate_benches);
