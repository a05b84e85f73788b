use std::time::Duration;

use serde::{Deserialize, Serialize};
use sw_core::{Real, SwError, SwResult, ensure_finite};

use crate::arc::Point;

/// Geometry and timing of the chart. Lengths are in canvas units (pixels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: Real,
    pub height: Real,
    pub radius: Real,
    /// Inner radius as a fraction of `radius`; 0 draws a plain pie.
    pub inner_radius_ratio: Real,
    /// Margin between the canvas edge and the chart's bounding box.
    pub padding: Real,
    pub transition_ms: u64,
    pub stroke_width: Real,
    /// Legend origin relative to the chart's right edge / the canvas top.
    pub legend_offset_x: Real,
    pub legend_offset_y: Real,
    pub legend_shape_radius: Real,
    pub legend_shape_padding: Real,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            radius: 150.0,
            inner_radius_ratio: 0.5,
            padding: 5.0,
            transition_ms: 750,
            stroke_width: 3.0,
            legend_offset_x: 40.0,
            legend_offset_y: 10.0,
            legend_shape_radius: 10.0,
            legend_shape_padding: 10.0,
        }
    }
}

impl ChartConfig {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn inner_radius(&self) -> Real {
        self.radius * self.inner_radius_ratio
    }

    /// Chart center in canvas coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            self.width / 2.0 + self.padding,
            self.height / 2.0 + self.padding,
        )
    }

    /// Top-left corner of the legend in canvas coordinates.
    pub fn legend_origin(&self) -> Point {
        Point::new(self.width + self.legend_offset_x, self.legend_offset_y)
    }

    /// Canvas size with room for the legend on the right.
    pub fn canvas_size(&self) -> (Real, Real) {
        (self.width + 150.0, self.height + 150.0)
    }

    pub fn validate(&self) -> SwResult<()> {
        let finite = [
            (self.width, "chart width"),
            (self.height, "chart height"),
            (self.radius, "chart radius"),
            (self.inner_radius_ratio, "inner radius ratio"),
            (self.padding, "padding"),
            (self.stroke_width, "stroke width"),
            (self.legend_offset_x, "legend offset x"),
            (self.legend_offset_y, "legend offset y"),
            (self.legend_shape_radius, "legend shape radius"),
            (self.legend_shape_padding, "legend shape padding"),
        ];
        for (value, what) in finite {
            ensure_finite(value, what)?;
        }

        let positive = [
            (self.width, "chart width must be positive"),
            (self.height, "chart height must be positive"),
            (self.radius, "chart radius must be positive"),
        ];
        for (value, what) in positive {
            if !(value > 0.0) {
                return Err(SwError::InvalidArg { what });
            }
        }
        if !(0.0..1.0).contains(&self.inner_radius_ratio) {
            return Err(SwError::InvalidArg {
                what: "inner radius ratio must be in [0, 1)",
            });
        }
        let non_negative = [
            (self.padding, "padding must not be negative"),
            (self.stroke_width, "stroke width must not be negative"),
            (self.legend_shape_radius, "legend shape radius must not be negative"),
            (self.legend_shape_padding, "legend shape padding must not be negative"),
        ];
        for (value, what) in non_negative {
            if !(value >= 0.0) {
                return Err(SwError::InvalidArg { what });
            }
        }
        Ok(())
    }
}
