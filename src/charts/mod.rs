//! Charts module - Interactive and exported chart rendering

mod palette;
mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
