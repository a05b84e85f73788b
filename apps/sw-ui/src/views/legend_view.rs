use egui::{Align2, Color32, FontId, Pos2, Vec2};
use sw_chart::Legend;

use super::chart_view::to_color32;

/// Circle swatches stacked down from `origin`, labels in white.
pub fn draw_legend(painter: &egui::Painter, origin: Pos2, legend: &Legend) {
    let r = legend.shape_radius as f32;
    let label_x = legend.label_offset_x() as f32;

    for entry in &legend.entries {
        let row = origin + Vec2::new(0.0, entry.offset_y as f32);
        painter.circle_filled(row + Vec2::splat(r), r, to_color32(entry.color));
        painter.text(
            row + Vec2::new(label_x, r),
            Align2::LEFT_CENTER,
            &entry.label,
            FontId::proportional(14.0),
            Color32::WHITE,
        );
    }
}
