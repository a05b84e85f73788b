use std::time::Instant;

use egui::{Color32, Mesh, Pos2, Sense, Shape, Stroke, Vec2};
use sw_app::ExpenseTracker;
use sw_chart::{ArcFrame, ArcGenerator, ChartConfig, Point, Rgb};
use sw_core::{ANGLE_EPSILON, Real, TAU};

use super::legend_view::draw_legend;

/// Largest angular step between tessellation points.
const MAX_STEP: Real = 0.03;

pub fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

#[derive(Default)]
pub struct ChartView;

impl ChartView {
    pub fn show(&mut self, ui: &mut egui::Ui, tracker: &ExpenseTracker, now: Instant) {
        let config = tracker.chart().config();
        let arc = tracker.chart().arc_generator();
        let frame = tracker.frame(now);

        let (width, height) = config.canvas_size();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width as f32, height as f32), Sense::hover());
        let origin = response.rect.min;
        let center = origin + to_vec(config.center());

        for a in &frame.arcs {
            paint_arc(&painter, arc, config, center, a);
        }
        draw_legend(&painter, origin + to_vec(config.legend_origin()), &frame.legend);

        if frame.arcs.is_empty() {
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                "No expenses yet",
                egui::FontId::proportional(14.0),
                Color32::GRAY,
            );
        }

        if let Some(pointer) = response.hover_pos()
            && let Some(hit) = frame.live_arcs().find(|a| hit_test(arc, center, pointer, a))
        {
            response.on_hover_text_at_pointer(format!("{}: {}", hit.name, hit.value));
        }
    }
}

fn to_vec(p: Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

fn paint_arc(
    painter: &egui::Painter,
    arc: &ArcGenerator,
    config: &ChartConfig,
    center: Pos2,
    frame: &ArcFrame,
) {
    if !(frame.angles.width() > ANGLE_EPSILON) {
        return;
    }
    let ring = arc.ring(&frame.angles, MAX_STEP);

    let color = to_color32(frame.color);
    let mut mesh = Mesh::default();
    for (outer, inner) in &ring {
        mesh.colored_vertex(center + to_vec(*outer), color);
        mesh.colored_vertex(center + to_vec(*inner), color);
    }
    for i in 0..(ring.len() as u32 - 1) {
        let k = 2 * i;
        mesh.add_triangle(k, k + 1, k + 2);
        mesh.add_triangle(k + 1, k + 3, k + 2);
    }
    painter.add(Shape::mesh(mesh));

    if config.stroke_width > 0.0 {
        let outline: Vec<Pos2> = arc
            .outline(&frame.angles, MAX_STEP)
            .into_iter()
            .map(|p| center + to_vec(p))
            .collect();
        painter.add(Shape::closed_line(
            outline,
            Stroke::new(config.stroke_width as f32, Color32::WHITE),
        ));
    }
}

fn hit_test(arc: &ArcGenerator, center: Pos2, pointer: Pos2, frame: &ArcFrame) -> bool {
    let d = pointer - center;
    let (x, y) = (d.x as Real, d.y as Real);
    let r = x.hypot(y);
    if r < arc.inner_radius() || r > arc.outer_radius() {
        return false;
    }
    // Angle clockwise from 12 o'clock, matching the layout.
    let angle = x.atan2(-y).rem_euclid(TAU);
    angle >= frame.angles.start && angle < frame.angles.end
}
