//! End-to-end scenarios: store -> tracker -> chart.

use std::time::{Duration, Instant};

use sw_app::{EMPTY_FIELDS_MESSAGE, ExpenseForm, ExpenseTracker, Reconciler};
use sw_chart::{ArcPhase, ChartConfig, ChartRenderer};
use sw_core::{ChangeBatch, Delta, ExpenseRecord, RecordId, TAU};
use sw_store::{DocumentStore, MemoryStore};

fn settled(t0: Instant) -> Instant {
    t0 + Duration::from_millis(800)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn food_and_rent_split_ten_ninety() {
    let t0 = Instant::now();
    let mut chart = ChartRenderer::new(ChartConfig::default());
    let mut reconciler =
        Reconciler::with_snapshot(vec![ExpenseRecord::new("1", "Food", 10.0)]);

    let batch = ChangeBatch::new(
        "expenses",
        vec![Delta::added(ExpenseRecord::new("2", "Rent", 90.0))],
    );
    reconciler.apply_batch(&batch, &mut |snap: &[ExpenseRecord]| {
        chart.update(snap, t0);
    });

    let frame = chart.frame(settled(t0));
    assert_eq!(frame.arcs.len(), 2);
    assert!(close(frame.arcs[0].angles.width(), 0.1 * TAU));
    assert!(close(frame.arcs[1].angles.width(), 0.9 * TAU));

    assert_eq!(frame.legend.labels(), vec!["Food", "Rent"]);
    assert_ne!(frame.legend.entries[0].color, frame.legend.entries[1].color);

    // Then Food is removed.
    let t1 = settled(t0);
    let batch = ChangeBatch::new(
        "expenses",
        vec![Delta::removed(ExpenseRecord::new("1", "Food", 10.0))],
    );
    reconciler.apply_batch(&batch, &mut |snap: &[ExpenseRecord]| {
        chart.update(snap, t1);
    });

    assert_eq!(chart.colors().domain(), &["Rent".to_string()]);
    assert_eq!(chart.legend().labels(), vec!["Rent"]);
    assert_eq!(
        chart.arc_phase(&RecordId::new("1")),
        Some(ArcPhase::Exiting)
    );

    let t2 = settled(t1);
    chart.retire_finished(t2);
    let frame = chart.frame(t2);
    assert_eq!(frame.arcs.len(), 1);
    assert_eq!(frame.arcs[0].name, "Rent");
    assert!(close(frame.arcs[0].angles.width(), TAU));
}

#[test]
fn form_write_reaches_chart_through_subscription() {
    let store = MemoryStore::new();
    let mut tracker =
        ExpenseTracker::connect(&store, "expenses", ChartConfig::default()).unwrap();
    let t0 = Instant::now();
    tracker.pump(t0).unwrap();
    assert!(tracker.snapshot().is_empty());

    let mut form = ExpenseForm::new();
    form.name = "Food".to_string();
    form.cost = "10".to_string();
    let id = form.submit_to(&store, "expenses").unwrap().unwrap();

    // Nothing drawn until the change comes back.
    assert_eq!(tracker.chart().live_arc_count(), 0);

    let report = tracker.pump(t0).unwrap();
    assert_eq!(report.chart.entered, 1);
    assert_eq!(tracker.snapshot()[0].id, id);
    assert_eq!(tracker.chart().live_arc_count(), 1);
}

#[test]
fn empty_cost_blocks_write() {
    let store = MemoryStore::new();
    let mut tracker =
        ExpenseTracker::connect(&store, "expenses", ChartConfig::default()).unwrap();
    let t0 = Instant::now();
    tracker.pump(t0).unwrap();

    let mut form = ExpenseForm::new();
    form.name = "Food".to_string();
    assert_eq!(form.submit_to(&store, "expenses").unwrap(), None);
    assert_eq!(form.error, EMPTY_FIELDS_MESSAGE);
    assert_eq!(form.name, "Food");
    assert_eq!(form.cost, "");

    assert!(tracker.pump(t0).unwrap().is_idle());
    assert!(store.list("expenses").unwrap().is_empty());
}

#[test]
fn modify_and_delete_round_trip() {
    let store = MemoryStore::with_documents(
        "expenses",
        vec![
            ExpenseRecord::new("a", "Food", 10.0),
            ExpenseRecord::new("b", "Rent", 90.0),
        ],
    )
    .unwrap();
    let mut tracker =
        ExpenseTracker::connect(&store, "expenses", ChartConfig::default()).unwrap();
    let t0 = Instant::now();
    tracker.pump(t0).unwrap();

    store
        .set(
            "expenses",
            &RecordId::new("a"),
            sw_core::NewExpense::new("Groceries", 30.0),
        )
        .unwrap();
    store.delete("expenses", &RecordId::new("b")).unwrap();

    let report = tracker.pump(t0).unwrap();
    assert_eq!(report.batches, 2);
    assert_eq!(report.deltas.replaced, 1);
    assert_eq!(report.deltas.removed, 1);
    assert_eq!(tracker.chart().redraws(), 3);
    assert_eq!(
        tracker.snapshot(),
        &[ExpenseRecord::new("a", "Groceries", 30.0)]
    );
}
