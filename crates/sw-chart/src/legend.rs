//! Category legend, rebuilt in full on every redraw.

use sw_core::Real;

use crate::color::{OrdinalScale, Rgb};
use crate::config::ChartConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    /// Vertical offset of the row from the legend origin.
    pub offset_y: Real,
}

/// Vertical list of circle swatches with labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub shape_radius: Real,
    pub shape_padding: Real,
}

impl Legend {
    pub fn from_scale(scale: &OrdinalScale, config: &ChartConfig) -> Self {
        let shape_radius = config.legend_shape_radius;
        let shape_padding = config.legend_shape_padding;
        let pitch = 2.0 * shape_radius + shape_padding;

        let entries = scale
            .domain()
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                scale.color_of(label).map(|color| LegendEntry {
                    label: label.clone(),
                    color,
                    offset_y: i as Real * pitch,
                })
            })
            .collect();

        Self {
            entries,
            shape_radius,
            shape_padding,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Horizontal offset of a label from the legend origin.
    pub fn label_offset_x(&self) -> Real {
        2.0 * self.shape_radius + self.shape_padding
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
