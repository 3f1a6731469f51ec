//! Two engines, same seed, same operations.
//! They must produce identical histories.

use chrono::NaiveDate;
use std::sync::Arc;
use tradeview_core::{
    engine::HistoryEngine,
    event::HistoryEvent,
    history::SnapshotHistory,
    snapshot::Snapshot,
    source::SyntheticSource,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_engine(seed: u64, start: NaiveDate) -> HistoryEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let history = Arc::new(SnapshotHistory::new());
    history.initialize();
    history.load_blob(None).expect("empty load");
    let mut engine = HistoryEngine::new(start, history, Box::new(SyntheticSource::new(seed)));
    engine.sample_now();
    engine
}

fn run(seed: u64, days: u64) -> Vec<Snapshot> {
    let mut engine = build_engine(seed, ymd(2000, 1, 1));
    engine.run_ticks(days);
    engine.history().snapshots()
}

#[test]
fn same_seed_produces_identical_histories() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    const DAYS: u64 = 3650; // ten in-game years

    let a = run(SEED, DAYS);
    let b = run(SEED, DAYS);

    assert_eq!(a.len(), 120, "one snapshot per month, Jan 2000 to Dec 2009");
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert_eq!(x, y, "History diverged at month {i}");
    }
    assert!(a.iter().all(|s| !s.is_gap_filler()));
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(run(1, 400), run(2, 400));
}

#[test]
fn ticking_into_a_new_month_records_it() {
    let mut engine = build_engine(7, ymd(2000, 1, 1));
    let rx = engine.history().subscribe();

    let events = engine.run_ticks(31);
    assert_eq!(engine.date(), ymd(2000, 2, 1));
    assert_eq!(
        events,
        vec![
            HistoryEvent::GapFilledForward { from: ymd(2000, 2, 1), to: ymd(2000, 2, 1), count: 1 },
            HistoryEvent::SampleRecorded { date: ymd(2000, 2, 1), replaced: true },
        ]
    );
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), events);
    assert!(engine.clock.paused);
}

#[test]
fn jumping_back_extends_history_backwards() {
    let mut engine = build_engine(7, ymd(2000, 1, 1));
    engine.run_ticks(60); // to 2000-03-01

    let events = engine.jump_to(ymd(1999, 6, 1));
    assert_eq!(
        events[0],
        HistoryEvent::GapFilledBackward { from: ymd(1999, 6, 1), to: ymd(1999, 12, 1), count: 7 }
    );
    let history = engine.history();
    assert_eq!(history.len(), 10);
    assert_eq!(history.first_date(), Some(ymd(1999, 6, 1)));
    assert!(!history.snapshots()[0].is_gap_filler());
    assert!(history.snapshots()[1].is_gap_filler());

    // Resuming from the jump target revisits months already stored.
    engine.run_ticks(30);
    assert_eq!(engine.date(), ymd(1999, 7, 1));
    assert!(!engine.history().snapshots()[1].is_gap_filler());
    assert_eq!(engine.history().len(), 10);
}
