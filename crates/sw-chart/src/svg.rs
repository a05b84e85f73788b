//! Static SVG export of a chart frame.

use std::time::Instant;

use crate::arc::ArcGenerator;
use crate::config::ChartConfig;
use crate::render::{ChartFrame, ChartRenderer};

/// Render the renderer's state at `now` as a standalone SVG document.
pub fn render_svg(renderer: &ChartRenderer, now: Instant) -> String {
    render_frame_svg(
        &renderer.frame(now),
        renderer.config(),
        renderer.arc_generator(),
    )
}

pub fn render_frame_svg(frame: &ChartFrame, config: &ChartConfig, arc: &ArcGenerator) -> String {
    let (width, height) = config.canvas_size();
    let center = config.center();
    let legend_origin = config.legend_origin();

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));

    out.push_str(&format!(
        "  <g class=\"chart\" transform=\"translate({}, {})\">\n",
        center.x, center.y
    ));
    for a in &frame.arcs {
        out.push_str(&format!(
            "    <path class=\"arc\" data-id=\"{}\" d=\"{}\" fill=\"{}\" stroke=\"#fff\" stroke-width=\"{}\"><title>{}: {}</title></path>\n",
            escape(a.id.as_str()),
            arc.path(&a.angles),
            a.color,
            config.stroke_width,
            escape(&a.name),
            a.value,
        ));
    }
    out.push_str("  </g>\n");

    let legend = &frame.legend;
    let r = legend.shape_radius;
    out.push_str(&format!(
        "  <g class=\"legend\" transform=\"translate({}, {})\">\n",
        legend_origin.x, legend_origin.y
    ));
    for entry in &legend.entries {
        out.push_str(&format!(
            "    <g class=\"cell\" transform=\"translate(0, {})\"><circle class=\"swatch\" cx=\"{r}\" cy=\"{r}\" r=\"{r}\" fill=\"{}\"/><text class=\"label\" x=\"{}\" y=\"{}\" fill=\"white\">{}</text></g>\n",
            entry.offset_y,
            entry.color,
            legend.label_offset_x(),
            r + 4.0,
            escape(&entry.label),
        ));
    }
    out.push_str("  </g>\n");
    out.push_str("</svg>\n");
    out
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
