//! # Draft League Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | dl-01 Rating Engine | 4v4 Elo update | < 10µs |
//! | dl-02 Queue State Machine | start + 6 picks | < 50µs |
//! | dl-02 Service | full match through in-memory adapters | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use dl_01_rating::{RatedPlayer, RatingEngine};
use dl_02_draft_queue::{DraftQueueApi, QueueStateMachine, ReportWinner};
use league_tests::fixtures::{drafted_queue, seeded_league};
use shared_types::{PlayerId, TeamSide};

// ============================================================================
// DL-01: Rating Engine
// ============================================================================

fn bench_rating_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-01-rating");
    let engine = RatingEngine::default();
    let mut rng = StdRng::seed_from_u64(7);

    let mut team = |prefix: &str| -> Vec<RatedPlayer> {
        (0..4)
            .map(|i| {
                RatedPlayer::new(
                    PlayerId::new(format!("{prefix}{i}")),
                    Some(rng.gen_range(600..1600)),
                )
            })
            .collect()
    };
    let team_a = team("a");
    let team_b = team("b");

    group.bench_function("compute_4v4", |b| {
        b.iter(|| engine.compute(black_box(&team_a), black_box(&team_b), TeamSide::A))
    });
    group.finish();
}

// ============================================================================
// DL-02: Queue State Machine
// ============================================================================

fn bench_draft(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-02-draft");

    let players: Vec<RatedPlayer> = (0..8)
        .map(|i| RatedPlayer::new(PlayerId::new(format!("p{i}")), Some(1000 + i * 25)))
        .collect();
    let mut waiting = match QueueStateMachine::create("bench") {
        Ok(queue) => queue,
        Err(err) => panic!("create: {err}"),
    };
    for player in &players {
        waiting = match QueueStateMachine::join(&waiting, &player.player_id) {
            Ok(queue) => queue,
            Err(err) => panic!("join: {err}"),
        };
    }

    group.bench_function("start_and_draft", |b| {
        b.iter(|| {
            let mut queue = QueueStateMachine::start_match(black_box(&waiting), &players).ok()?;
            while let Some(drafter) = queue.current_drafter().cloned() {
                let pick = queue.draft.as_ref()?.draft_pool.iter().next()?.clone();
                queue = QueueStateMachine::pick(&queue, &drafter, &pick).ok()?;
            }
            Some(queue)
        })
    });
    group.finish();
}

// ============================================================================
// DL-02: Service over in-memory adapters
// ============================================================================

fn bench_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("dl-02-service");
    group.measurement_time(Duration::from_secs(10));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => panic!("tokio runtime: {err}"),
    };

    group.bench_function("draft_and_report", |b| {
        b.to_async(&runtime).iter(|| async {
            let league = seeded_league().await.ok()?;
            let queue_id = drafted_queue(&league, "bench").await.ok()?;
            league
                .draft_queue
                .report_winner(ReportWinner {
                    queue_id,
                    winning_team: TeamSide::A,
                    base_version: None,
                })
                .await
                .ok()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_rating_engine, bench_draft, bench_full_match);
criterion_main!(benches);
