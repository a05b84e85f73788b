//! One subscription, one reconciler, one chart.

use std::time::{Duration, Instant};

use sw_chart::{ChartConfig, ChartFrame, ChartRenderer, UpdateSummary};
use sw_core::{ChangeBatch, ExpenseRecord};
use sw_store::{DocumentStore, Subscription};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::reconciler::{BatchReport, Reconciler, SnapshotSink};

/// Feeds redraws into the chart at a fixed instant.
struct ChartSink<'a> {
    chart: &'a mut ChartRenderer,
    now: Instant,
    summary: UpdateSummary,
}

impl SnapshotSink for ChartSink<'_> {
    fn redraw(&mut self, snapshot: &[ExpenseRecord]) {
        let s = self.chart.update(snapshot, self.now);
        self.summary.entered += s.entered;
        self.summary.updated += s.updated;
        self.summary.exited += s.exited;
    }
}

/// What one [`ExpenseTracker::pump`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpReport {
    pub batches: usize,
    pub deltas: BatchReport,
    pub chart: UpdateSummary,
    pub retired: usize,
}

impl PumpReport {
    pub fn is_idle(&self) -> bool {
        self.batches == 0 && self.retired == 0
    }

    fn merge(&mut self, other: PumpReport) {
        self.batches += other.batches;
        self.deltas.merge(other.deltas);
        self.chart.entered += other.chart.entered;
        self.chart.updated += other.chart.updated;
        self.chart.exited += other.chart.exited;
        self.retired += other.retired;
    }
}

pub struct ExpenseTracker {
    subscription: Subscription,
    reconciler: Reconciler,
    chart: ChartRenderer,
}

impl ExpenseTracker {
    /// Subscribe to `collection`. Nothing is drawn until the first pump
    /// picks up the initial batch.
    pub fn connect(
        store: &dyn DocumentStore,
        collection: &str,
        chart: ChartConfig,
    ) -> AppResult<Self> {
        let subscription = store.subscribe(collection)?;
        info!(collection, "tracker connected");
        Ok(Self::from_subscription(subscription, chart))
    }

    pub fn from_subscription(subscription: Subscription, chart: ChartConfig) -> Self {
        Self {
            subscription,
            reconciler: Reconciler::new(),
            chart: ChartRenderer::new(chart),
        }
    }

    pub fn collection(&self) -> &str {
        self.subscription.collection()
    }

    /// Apply every batch already delivered, one redraw each, then drop
    /// finished exit arcs.
    ///
    /// Batches received before the stream closed are applied before
    /// `SubscriptionClosed` is returned.
    pub fn pump(&mut self, now: Instant) -> AppResult<PumpReport> {
        let (batches, closed) = self.subscription.drain();
        let mut report = self.apply(&batches, now);
        report.retired = self.chart.retire_finished(now);

        if closed {
            warn!(collection = self.collection(), "subscription closed");
            return Err(AppError::SubscriptionClosed {
                collection: self.collection().to_string(),
            });
        }
        Ok(report)
    }

    /// Block up to `timeout` for the next batch, then pump.
    pub fn pump_wait(&mut self, timeout: Duration) -> AppResult<PumpReport> {
        let first = self.subscription.next_timeout(timeout)?;
        let now = Instant::now();
        let mut report = self.apply(first.as_slice(), now);

        report.merge(self.pump(now)?);
        Ok(report)
    }

    fn apply(&mut self, batches: &[ChangeBatch], now: Instant) -> PumpReport {
        let mut sink = ChartSink {
            chart: &mut self.chart,
            now,
            summary: UpdateSummary::default(),
        };
        let mut report = PumpReport::default();

        for batch in batches {
            report.deltas.merge(self.reconciler.apply_batch(batch, &mut sink));
            report.batches += 1;
        }
        report.chart = sink.summary;
        report
    }

    pub fn snapshot(&self) -> &[ExpenseRecord] {
        self.reconciler.snapshot()
    }

    pub fn chart(&self) -> &ChartRenderer {
        &self.chart
    }

    pub fn frame(&self, now: Instant) -> ChartFrame {
        self.chart.frame(now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.chart.is_animating(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::NewExpense;
    use sw_store::MemoryStore;

    #[test]
    fn initial_batch_then_one_redraw_per_commit() {
        let store = MemoryStore::with_documents(
            "expenses",
            vec![ExpenseRecord::new("1", "Food", 10.0)],
        )
        .unwrap();
        let mut tracker =
            ExpenseTracker::connect(&store, "expenses", ChartConfig::default()).unwrap();
        let t0 = Instant::now();

        let report = tracker.pump(t0).unwrap();
        assert_eq!(report.batches, 1);
        assert_eq!(report.deltas.appended, 1);
        assert_eq!(tracker.chart().redraws(), 1);

        store
            .commit(
                "expenses",
                vec![
                    sw_store::Write::Add(NewExpense::new("Rent", 90.0)),
                    sw_store::Write::Add(NewExpense::new("Fun", 5.0)),
                ],
            )
            .unwrap();
        let report = tracker.pump(t0).unwrap();
        assert_eq!(report.batches, 1);
        assert_eq!(report.chart.entered, 2);
        assert_eq!(tracker.chart().redraws(), 2);
        assert_eq!(tracker.snapshot().len(), 3);
    }

    #[test]
    fn idle_pump_does_not_redraw() {
        let store = MemoryStore::new();
        let mut tracker =
            ExpenseTracker::connect(&store, "expenses", ChartConfig::default()).unwrap();
        let t0 = Instant::now();
        tracker.pump(t0).unwrap();

        let report = tracker.pump(t0).unwrap();
        assert!(report.is_idle());
        assert_eq!(tracker.chart().redraws(), 1);
    }

    #[test]
    fn dropped_store_closes_tracker() {
        let store = MemoryStore::new();
        let mut tracker =
            ExpenseTracker::connect(&store, "expenses", ChartConfig::default()).unwrap();
        drop(store);

        let err = tracker.pump(Instant::now()).unwrap_err();
        assert!(matches!(err, AppError::SubscriptionClosed { ref collection } if collection == "expenses"));
        // The initial batch still landed.
        assert_eq!(tracker.chart().redraws(), 1);
    }
}
