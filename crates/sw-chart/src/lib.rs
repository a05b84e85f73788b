//! sw-chart: animated donut chart for expense snapshots.
//!
//! The renderer is drawing-surface agnostic. It produces [`ChartFrame`]s
//! (angles, colors, legend) that a frontend paints, and [`ArcGenerator`]
//! turns angles into SVG paths or polygon rings.

pub mod arc;
pub mod color;
pub mod config;
pub mod legend;
pub mod pie;
pub mod render;
pub mod svg;
pub mod tween;

pub use arc::{ArcGenerator, Point};
pub use color::{OrdinalScale, Rgb, SET3};
pub use config::ChartConfig;
pub use legend::{Legend, LegendEntry};
pub use pie::{PieLayout, PieSlice};
pub use render::{ArcFrame, ArcPhase, ChartFrame, ChartRenderer, UpdateSummary};
pub use svg::{render_frame_svg, render_svg};
pub use tween::{AngularState, EasingFn, Transition, cubic_in_out, linear};
