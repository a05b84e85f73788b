pub mod chart_view;
pub mod form_view;
pub mod legend_view;

pub use chart_view::ChartView;
pub use form_view::FormView;
pub use legend_view::draw_legend;
