//! Donut renderer with enter/update/exit transitions.
//!
//! Render state is an arena of arc slots plus an identifier index. Each slot
//! owns the transition currently driving it, so the live on-screen angles can
//! be sampled at any instant and used as the source of the next transition.

use std::collections::HashMap;
use std::time::Instant;

use sw_core::{ExpenseRecord, Real, RecordId};
use tracing::debug;

use crate::arc::ArcGenerator;
use crate::color::{OrdinalScale, Rgb};
use crate::config::ChartConfig;
use crate::legend::Legend;
use crate::pie::PieLayout;
use crate::tween::{AngularState, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcPhase {
    Entering,
    Updating,
    Exiting,
}

#[derive(Debug, Clone)]
struct ArcSlot {
    id: RecordId,
    name: String,
    value: Real,
    color: Rgb,
    phase: ArcPhase,
    transition: Transition,
}

/// Counts from one [`ChartRenderer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// One arc as it should be drawn at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcFrame {
    pub id: RecordId,
    pub name: String,
    pub value: Real,
    pub color: Rgb,
    pub phase: ArcPhase,
    pub angles: AngularState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub arcs: Vec<ArcFrame>,
    pub legend: Legend,
}

impl ChartFrame {
    /// Arcs that are not on their way out.
    pub fn live_arcs(&self) -> impl Iterator<Item = &ArcFrame> {
        self.arcs.iter().filter(|a| a.phase != ArcPhase::Exiting)
    }
}

pub struct ChartRenderer {
    config: ChartConfig,
    pie: PieLayout,
    arc: ArcGenerator,
    colors: OrdinalScale,
    legend: Legend,
    slots: Vec<ArcSlot>,
    index: HashMap<RecordId, usize>,
    redraws: u64,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        let arc = ArcGenerator::new(config.inner_radius(), config.radius);
        Self {
            config,
            pie: PieLayout::default(),
            arc,
            colors: OrdinalScale::default(),
            legend: Legend::default(),
            slots: Vec::new(),
            index: HashMap::new(),
            redraws: 0,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn arc_generator(&self) -> &ArcGenerator {
        &self.arc
    }

    pub fn colors(&self) -> &OrdinalScale {
        &self.colors
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Number of `update` calls so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Redraw for a new snapshot, starting transitions at `now`.
    pub fn update(&mut self, snapshot: &[ExpenseRecord], now: Instant) -> UpdateSummary {
        self.retire_finished(now);

        self.colors.set_domain(snapshot.iter().map(|r| r.name.as_str()));
        let slices = self.pie.layout(snapshot);
        let duration = self.config.transition();

        let old_index = std::mem::take(&mut self.index);
        let mut old: Vec<Option<ArcSlot>> =
            std::mem::take(&mut self.slots).into_iter().map(Some).collect();
        let mut next = Vec::with_capacity(slices.len() + old.len());
        let mut summary = UpdateSummary::default();

        for slice in slices {
            let color = self.colors.resolve(&slice.name);
            let previous = old_index
                .get(&slice.id)
                .and_then(|&i| old.get_mut(i))
                .and_then(Option::take);

            let slot = match previous {
                Some(mut slot) => {
                    let live = slot.transition.sample(now);
                    slot.transition = Transition::new(live, slice.angles, now, duration);
                    slot.phase = ArcPhase::Updating;
                    slot.name = slice.name;
                    slot.value = slice.value;
                    slot.color = color;
                    summary.updated += 1;
                    slot
                }
                None => {
                    let from = slice.angles.collapsed_to_end();
                    summary.entered += 1;
                    ArcSlot {
                        id: slice.id,
                        name: slice.name,
                        value: slice.value,
                        color,
                        phase: ArcPhase::Entering,
                        transition: Transition::new(from, slice.angles, now, duration),
                    }
                }
            };
            next.push(slot);
        }

        for mut slot in old.into_iter().flatten() {
            if slot.phase != ArcPhase::Exiting {
                // Exiting arcs keep their last color; their name may have
                // left the domain already.
                let live = slot.transition.sample(now);
                slot.transition = Transition::new(live, live.collapsed_to_end(), now, duration);
                slot.phase = ArcPhase::Exiting;
                summary.exited += 1;
            }
            next.push(slot);
        }

        self.slots = next;
        self.rebuild_index();
        self.legend = Legend::from_scale(&self.colors, &self.config);
        self.redraws += 1;

        debug!(
            records = snapshot.len(),
            entered = summary.entered,
            updated = summary.updated,
            exited = summary.exited,
            "chart redraw"
        );
        summary
    }

    /// Drop exiting arcs whose collapse has finished. Returns how many went.
    pub fn retire_finished(&mut self, now: Instant) -> usize {
        let before = self.slots.len();
        self.slots
            .retain(|s| !(s.phase == ArcPhase::Exiting && s.transition.is_finished(now)));
        let removed = before - self.slots.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Everything to draw at `now`.
    pub fn frame(&self, now: Instant) -> ChartFrame {
        let arcs = self
            .slots
            .iter()
            .filter(|s| !(s.phase == ArcPhase::Exiting && s.transition.is_finished(now)))
            .map(|s| ArcFrame {
                id: s.id.clone(),
                name: s.name.clone(),
                value: s.value,
                color: s.color,
                phase: s.phase,
                angles: s.transition.sample(now),
            })
            .collect();

        ChartFrame {
            arcs,
            legend: self.legend.clone(),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.slots.iter().any(|s| !s.transition.is_finished(now))
    }

    /// Arcs currently in the chart, excluding ones collapsing away.
    pub fn live_arc_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.phase != ArcPhase::Exiting)
            .count()
    }

    /// Total slots, including exiting arcs not yet retired.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Live angles of one arc.
    pub fn arc_state(&self, id: &RecordId, now: Instant) -> Option<AngularState> {
        self.index
            .get(id)
            .and_then(|&i| self.slots.get(i))
            .map(|s| s.transition.sample(now))
    }

    pub fn arc_phase(&self, id: &RecordId) -> Option<ArcPhase> {
        self.index
            .get(id)
            .and_then(|&i| self.slots.get(i))
            .map(|s| s.phase)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, slot) in self.slots.iter().enumerate() {
            self.index.insert(slot.id.clone(), i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use sw_core::TAU;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn close(a: AngularState, b: AngularState) -> bool {
        (a.start - b.start).abs() < 1e-12 && (a.end - b.end).abs() < 1e-12
    }

    fn rec(id: &str, name: &str, cost: Real) -> ExpenseRecord {
        ExpenseRecord::new(id, name, cost)
    }

    #[test]
    fn entering_arc_starts_collapsed_at_its_end() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        let summary = chart.update(&[rec("1", "Food", 10.0), rec("2", "Rent", 30.0)], t0);
        assert_eq!(summary.entered, 2);

        let food = chart.arc_state(&RecordId::new("1"), t0).unwrap();
        assert!(close(food, AngularState::new(TAU / 4.0, TAU / 4.0)));
        let rent = chart.arc_state(&RecordId::new("2"), t0).unwrap();
        assert_eq!(rent.start, rent.end);

        let settled = chart.arc_state(&RecordId::new("1"), t0 + ms(750)).unwrap();
        assert!(close(settled, AngularState::new(0.0, TAU / 4.0)));
        assert!(!chart.is_animating(t0 + ms(750)));
    }

    #[test]
    fn persisting_arc_restarts_from_live_value() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        chart.update(&[rec("1", "Food", 50.0), rec("2", "Rent", 50.0)], t0);

        // Interrupt halfway through the enter transition.
        let mid = t0 + ms(375);
        let live = chart.arc_state(&RecordId::new("2"), mid).unwrap();
        let summary = chart.update(&[rec("1", "Food", 25.0), rec("2", "Rent", 75.0)], mid);
        assert_eq!(summary.updated, 2);
        assert_eq!(summary.entered, 0);

        // No snap: the new transition begins exactly where the old one was.
        assert_eq!(chart.arc_state(&RecordId::new("2"), mid).unwrap(), live);
        assert_eq!(chart.arc_phase(&RecordId::new("2")), Some(ArcPhase::Updating));

        let end = chart.arc_state(&RecordId::new("2"), mid + ms(750)).unwrap();
        assert!((end.start - TAU / 4.0).abs() < 1e-12);
        assert!((end.end - TAU).abs() < 1e-12);
    }

    #[test]
    fn exiting_arc_collapses_then_retires() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        chart.update(&[rec("1", "Food", 10.0), rec("2", "Rent", 90.0)], t0);

        let t1 = t0 + ms(1000);
        let summary = chart.update(&[rec("2", "Rent", 90.0)], t1);
        assert_eq!(summary.exited, 1);
        assert_eq!(chart.live_arc_count(), 1);
        assert_eq!(chart.slot_count(), 2);
        assert_eq!(chart.arc_phase(&RecordId::new("1")), Some(ArcPhase::Exiting));

        // Halfway: start angle has moved toward the end, end is fixed.
        let food_mid = chart.arc_state(&RecordId::new("1"), t1 + ms(375)).unwrap();
        assert!(food_mid.start > 0.0);
        assert!((food_mid.end - 0.1 * TAU).abs() < 1e-12);

        let t2 = t1 + ms(750);
        assert_eq!(chart.frame(t2).arcs.len(), 1);
        assert_eq!(chart.retire_finished(t2), 1);
        assert_eq!(chart.slot_count(), 1);
        assert!(chart.arc_state(&RecordId::new("1"), t2).is_none());
    }

    #[test]
    fn exiting_arc_keeps_its_color_after_domain_drops_it() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        chart.update(&[rec("1", "Food", 10.0), rec("2", "Rent", 90.0)], t0);
        let food_color = chart.colors().color_of("Food").unwrap();

        chart.update(&[rec("2", "Rent", 90.0)], t0 + ms(800));
        assert!(chart.colors().color_of("Food").is_none());
        assert_eq!(chart.colors().domain(), ["Rent"]);

        let frame = chart.frame(t0 + ms(900));
        let food = frame.arcs.iter().find(|a| a.name == "Food").unwrap();
        assert_eq!(food.color, food_color);
    }

    #[test]
    fn readded_identifier_recovers_from_exit() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        chart.update(&[rec("1", "Food", 10.0), rec("2", "Rent", 10.0)], t0);
        chart.update(&[rec("2", "Rent", 10.0)], t0 + ms(800));
        let summary = chart.update(
            &[rec("2", "Rent", 10.0), rec("1", "Food", 10.0)],
            t0 + ms(1000),
        );
        assert_eq!(summary.updated, 2);
        assert_eq!(chart.slot_count(), 2);
        assert_eq!(chart.arc_phase(&RecordId::new("1")), Some(ArcPhase::Updating));
    }

    #[test]
    fn rapid_updates_overlap_without_snapping() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        let id = RecordId::new("a");
        chart.update(&[rec("a", "Food", 10.0), rec("b", "Rent", 10.0)], t0);

        let mut t = t0;
        for step in 1..=5 {
            t += ms(100);
            let before = chart.arc_state(&id, t).unwrap();
            chart.update(
                &[rec("a", "Food", 10.0 + step as Real * 10.0), rec("b", "Rent", 10.0)],
                t,
            );
            assert_eq!(chart.arc_state(&id, t).unwrap(), before);
        }
        assert!(chart.is_animating(t));
        assert!(!chart.is_animating(t + ms(750)));
    }

    #[test]
    fn settled_frame_covers_full_circle() {
        let t0 = Instant::now();
        let mut chart = ChartRenderer::new(ChartConfig::default());
        chart.update(
            &[rec("1", "Food", 3.0), rec("2", "Rent", 5.0), rec("3", "Fun", 0.0)],
            t0,
        );
        let frame = chart.frame(t0 + ms(750));
        let total: Real = frame.live_arcs().map(|a| a.angles.width()).sum();
        assert!((total - TAU).abs() < 1e-9);
    }
}
