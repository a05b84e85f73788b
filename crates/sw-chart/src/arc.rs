//! Annular-sector geometry.
//!
//! Coordinates are relative to the chart center with y pointing down, so an
//! angle `a` maps to `(r sin a, -r cos a)`: 0 is twelve o'clock and angles
//! grow clockwise on screen.

use std::f64::consts::PI;

use sw_core::{ANGLE_EPSILON, Real, TAU};

use crate::tween::AngularState;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    pub fn polar(radius: Real, angle: Real) -> Self {
        Self::new(radius * angle.sin(), -radius * angle.cos())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGenerator {
    inner_radius: Real,
    outer_radius: Real,
}

impl ArcGenerator {
    pub fn new(inner_radius: Real, outer_radius: Real) -> Self {
        let (inner_radius, outer_radius) = if inner_radius <= outer_radius {
            (inner_radius.max(0.0), outer_radius)
        } else {
            (outer_radius.max(0.0), inner_radius)
        };
        Self {
            inner_radius,
            outer_radius,
        }
    }

    pub fn inner_radius(&self) -> Real {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> Real {
        self.outer_radius
    }

    /// SVG path data for the sector, relative to the center.
    pub fn path(&self, angles: &AngularState) -> String {
        let (ri, ro) = (self.inner_radius, self.outer_radius);
        if ro <= ANGLE_EPSILON || !angles.start.is_finite() || !angles.end.is_finite() {
            return "M0,0Z".to_string();
        }

        let (a0, a1) = (angles.start, angles.end);
        let da = (a1 - a0).abs();
        let has_hole = ri > ANGLE_EPSILON;

        if da >= TAU - ANGLE_EPSILON {
            // Full ring: two half-circle arcs per radius.
            let mut d = format!(
                "M{}A{ro:.3},{ro:.3},0,1,1,{}A{ro:.3},{ro:.3},0,1,1,{}",
                fmt_point(Point::new(0.0, -ro)),
                fmt_point(Point::new(0.0, ro)),
                fmt_point(Point::new(0.0, -ro)),
            );
            if has_hole {
                d.push_str(&format!(
                    "M{}A{ri:.3},{ri:.3},0,1,0,{}A{ri:.3},{ri:.3},0,1,0,{}",
                    fmt_point(Point::new(0.0, -ri)),
                    fmt_point(Point::new(0.0, ri)),
                    fmt_point(Point::new(0.0, -ri)),
                ));
            }
            d.push('Z');
            return d;
        }

        let large = u8::from(da > PI);
        let sweep = u8::from(a1 >= a0);
        let mut d = format!(
            "M{}A{ro:.3},{ro:.3},0,{large},{sweep},{}",
            fmt_point(Point::polar(ro, a0)),
            fmt_point(Point::polar(ro, a1)),
        );
        if has_hole {
            d.push_str(&format!(
                "L{}A{ri:.3},{ri:.3},0,{large},{},{}",
                fmt_point(Point::polar(ri, a1)),
                1 - sweep,
                fmt_point(Point::polar(ri, a0)),
            ));
        } else {
            d.push_str("L0,0");
        }
        d.push('Z');
        d
    }

    /// Paired (outer, inner) points along the sector, one pair per step,
    /// spaced no more than `max_step` radians apart.
    pub fn ring(&self, angles: &AngularState, max_step: Real) -> Vec<(Point, Point)> {
        if !angles.start.is_finite() || !angles.end.is_finite() {
            return Vec::new();
        }
        let da = angles.width();
        let step = if max_step > ANGLE_EPSILON { max_step } else { 0.05 };
        let segments = ((da.abs() / step).ceil() as usize).max(1);

        (0..=segments)
            .map(|i| {
                let a = angles.start + da * (i as Real / segments as Real);
                (
                    Point::polar(self.outer_radius, a),
                    Point::polar(self.inner_radius, a),
                )
            })
            .collect()
    }

    /// Closed outline: outer edge forward, inner edge back.
    pub fn outline(&self, angles: &AngularState, max_step: Real) -> Vec<Point> {
        let ring = self.ring(angles, max_step);
        let mut points: Vec<Point> = ring.iter().map(|(outer, _)| *outer).collect();
        points.extend(ring.iter().rev().map(|(_, inner)| *inner));
        points
    }

    /// Midpoint of the sector (mid angle, mid radius).
    pub fn centroid(&self, angles: &AngularState) -> Point {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (angles.start + angles.end) / 2.0;
        Point::polar(r, a)
    }
}

fn fmt_point(p: Point) -> String {
    format!("{:.3},{:.3}", clean_zero(p.x), clean_zero(p.y))
}

/// Avoid "-0.000" in output.
fn clean_zero(v: Real) -> Real {
    if v.abs() < 5e-4 { 0.0 } else { v }
}
