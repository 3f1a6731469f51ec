//! Gap filling and sample recording on the shared history.

use chrono::NaiveDate;
use tradeview_core::{
    codec,
    event::HistoryEvent,
    history::SnapshotHistory,
    resource::CATEGORY_COUNT,
    snapshot::{RawTotals, Snapshot},
    source::FixedSource,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn totals(base: u32) -> RawTotals {
    std::array::from_fn(|i| base + i as u32)
}

fn loaded_history() -> SnapshotHistory {
    init_logging();
    let history = SnapshotHistory::new();
    history.initialize();
    history.load_blob(None).expect("empty load");
    history
}

fn dates(history: &SnapshotHistory) -> Vec<NaiveDate> {
    history.snapshots().iter().map(|s| s.date).collect()
}

#[test]
fn skipped_months_become_gap_fillers() {
    let history = loaded_history();
    let mut source = FixedSource(totals(100));

    history.record_sample(ymd(2020, 1, 1), &mut source);
    history.record_sample(ymd(2020, 4, 1), &mut source);

    let snapshots = history.snapshots();
    assert_eq!(
        dates(&history),
        vec![ymd(2020, 1, 1), ymd(2020, 2, 1), ymd(2020, 3, 1), ymd(2020, 4, 1)]
    );
    assert_eq!(snapshots[0].values[0], Some(100));
    assert!(snapshots[1].is_gap_filler());
    assert!(snapshots[2].is_gap_filler());
    assert_eq!(snapshots[3].values[12], Some(112));
}

#[test]
fn first_sample_on_empty_history_is_appended() {
    let history = loaded_history();
    let events = history.record_sample(ymd(2020, 1, 1), &mut FixedSource(totals(1)));
    assert_eq!(
        events,
        vec![HistoryEvent::SampleRecorded { date: ymd(2020, 1, 1), replaced: false }]
    );
}

#[test]
fn mid_month_dates_only_fill() {
    let history = loaded_history();
    let mut source = FixedSource(totals(5));
    history.record_sample(ymd(2020, 1, 1), &mut source);

    let events = history.record_sample(ymd(2020, 2, 14), &mut source);
    assert_eq!(
        events,
        vec![HistoryEvent::GapFilledForward { from: ymd(2020, 2, 1), to: ymd(2020, 2, 1), count: 1 }]
    );
    assert!(history.snapshots()[1].is_gap_filler());

    // The rest of the month changes nothing.
    assert!(history.record_sample(ymd(2020, 2, 15), &mut source).is_empty());
    assert_eq!(history.len(), 2);
}

#[test]
fn same_day_is_sampled_once() {
    let history = loaded_history();
    let mut calls = 0u32;
    let mut source = |_m: NaiveDate| {
        calls += 1;
        [calls; CATEGORY_COUNT]
    };
    history.record_sample(ymd(2020, 1, 1), &mut source);
    let events = history.record_sample(ymd(2020, 1, 1), &mut source);
    assert!(events.is_empty());
    assert_eq!(history.snapshots()[0].values[0], Some(1));
}

#[test]
fn backward_jump_prepends_fillers() {
    let history = loaded_history();
    let mut source = FixedSource(totals(10));
    history.record_sample(ymd(2020, 1, 1), &mut source);
    history.record_sample(ymd(2020, 3, 1), &mut source);

    // Mid-month: October itself is not covered, November onwards is.
    let events = history.record_sample(ymd(2019, 10, 15), &mut source);
    assert_eq!(
        events,
        vec![HistoryEvent::GapFilledBackward { from: ymd(2019, 11, 1), to: ymd(2019, 12, 1), count: 2 }]
    );
    assert_eq!(history.first_date(), Some(ymd(2019, 11, 1)));

    // Day 1 of an earlier month gets a filler and then a real sample.
    history.record_sample(ymd(2019, 10, 1), &mut source);
    let snapshots = history.snapshots();
    assert_eq!(snapshots[0].date, ymd(2019, 10, 1));
    assert_eq!(snapshots[0].values[0], Some(10));
    assert_eq!(history.len(), 6);
}

#[test]
fn history_stays_sorted_and_unique() {
    let history = loaded_history();
    let mut source = FixedSource(totals(3));
    let jumps = [
        ymd(2010, 6, 1), ymd(2011, 2, 17), ymd(2009, 1, 1), ymd(2012, 12, 1),
        ymd(2010, 6, 1), ymd(2008, 7, 9), ymd(2013, 1, 1),
    ];
    for date in jumps {
        history.record_sample(date, &mut source);
    }
    let dates = dates(&history);
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(dates.first(), Some(&ymd(2008, 8, 1)));
    assert_eq!(dates.last(), Some(&ymd(2013, 1, 1)));
}

#[test]
fn forward_fill_stops_at_last_calendar_month() {
    let history = loaded_history();
    let mut source = FixedSource(totals(1));
    history.record_sample(ymd(9999, 11, 1), &mut source);
    history.record_sample(ymd(9999, 12, 1), &mut source);
    assert!(history.record_sample(ymd(9999, 12, 31), &mut source).is_empty());
    assert_eq!(history.last_date(), Some(ymd(9999, 12, 1)));
    assert_eq!(history.len(), 2);
}

#[test]
fn backward_fill_stops_at_year_one() {
    let history = loaded_history();
    let mut source = FixedSource(totals(1));
    history.record_sample(ymd(1, 3, 1), &mut source);
    history.record_sample(ymd(1, 1, 1), &mut source);
    assert_eq!(dates(&history), vec![ymd(1, 1, 1), ymd(1, 2, 1), ymd(1, 3, 1)]);
}

#[test]
fn samples_are_ignored_until_loaded() {
    init_logging();
    let history = SnapshotHistory::new();
    let mut source = FixedSource(totals(1));
    assert!(history.record_sample(ymd(2020, 1, 1), &mut source).is_empty());

    history.initialize();
    assert!(history.record_sample(ymd(2020, 1, 1), &mut source).is_empty());
    assert!(history.is_empty());
    assert!(!history.is_loaded());
}

#[test]
fn subscribers_see_every_change() {
    let history = loaded_history();
    let rx = history.subscribe();
    let mut source = FixedSource(totals(1));
    history.record_sample(ymd(2020, 1, 1), &mut source);
    history.record_sample(ymd(2020, 1, 2), &mut source);
    history.record_sample(ymd(2020, 3, 1), &mut source);
    history.deinitialize();

    let names: Vec<&str> = rx.try_iter().map(|e| e.type_name()).collect();
    assert_eq!(
        names,
        vec!["sample_recorded", "gap_filled_forward", "sample_recorded", "deinitialized"]
    );
    assert!(history.is_empty());
}

#[test]
fn loaded_history_with_a_hole_takes_a_sample_inside_it() {
    init_logging();
    let saved = vec![
        Snapshot::real(ymd(2020, 1, 1), totals(1)),
        Snapshot::real(ymd(2020, 3, 1), totals(3)),
    ];
    let history = SnapshotHistory::new();
    history.initialize();
    assert_eq!(history.load_blob(Some(&codec::encode(&saved))).unwrap(), 2);

    let events = history.record_sample(ymd(2020, 2, 1), &mut FixedSource(totals(2)));
    assert_eq!(
        events,
        vec![HistoryEvent::SampleRecorded { date: ymd(2020, 2, 1), replaced: false }]
    );
    let snapshots = history.snapshots();
    assert_eq!(
        dates(&history),
        vec![ymd(2020, 1, 1), ymd(2020, 2, 1), ymd(2020, 3, 1)]
    );
    assert_eq!(snapshots[1].values[0], Some(2));
    assert_eq!(snapshots[2].values[0], Some(3));
}
