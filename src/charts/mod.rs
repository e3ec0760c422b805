//! Charts module - Chart geometry and rendering

mod plotter;
mod renderer;

pub use plotter::{angle_of, arc_angles, polar, slice_color, slice_polygons, ChartPlotter, PieChart, PieSlice};
pub use renderer::{ExportError, StaticChartRenderer, EVENT_TYPES_FILE, TOP_BRANDS_FILE};
