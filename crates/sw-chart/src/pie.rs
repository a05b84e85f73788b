//! Slice angles from weighted records.

use sw_core::{ExpenseRecord, Real, RecordId, TAU, positive_weight};

use crate::tween::AngularState;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub id: RecordId,
    pub name: String,
    /// Raw cost as recorded, even when it contributes no width.
    pub value: Real,
    /// Position in the input snapshot.
    pub index: usize,
    pub angles: AngularState,
}

/// Unsorted pie layout: slices keep input order so they don't reshuffle
/// when relative costs change.
#[derive(Debug, Clone, Copy)]
pub struct PieLayout {
    start_angle: Real,
    end_angle: Real,
}

impl Default for PieLayout {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: TAU,
        }
    }
}

impl PieLayout {
    pub fn new(start_angle: Real, end_angle: Real) -> Self {
        Self {
            start_angle,
            end_angle,
        }
    }

    /// One slice per record. Non-positive or non-finite costs get zero width;
    /// if nothing is positive every slice collapses onto the start angle.
    pub fn layout(&self, records: &[ExpenseRecord]) -> Vec<PieSlice> {
        let sum: Real = records.iter().map(|r| positive_weight(r.cost)).sum();
        let k = if sum > 0.0 {
            (self.end_angle - self.start_angle) / sum
        } else {
            0.0
        };

        let mut angle = self.start_angle;
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let width = positive_weight(record.cost) * k;
                let slice = PieSlice {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    value: record.cost,
                    index,
                    angles: AngularState::new(angle, angle + width),
                };
                angle += width;
                slice
            })
            .collect()
    }
}
