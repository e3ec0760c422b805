//! Static Chart Renderer
//! Writes the dashboard charts as PNG files with plotters.
//!
//! Layout:
//! 1. `event_types.png`: pie of the event-type distribution
//! 2. `top_brands.png`: two donuts side by side, "Purchased" and "Viewed"

use crate::charts::plotter::{slice_polygons, slice_rgb, PieChart};
use crate::data::DashboardData;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const EVENT_TYPES_FILE: &str = "event_types.png";
pub const TOP_BRANDS_FILE: &str = "top_brands.png";

const FONT: &str = "sans-serif";
const GRAY: RGBColor = RGBColor(160, 160, 160);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err(e: impl Display) -> ExportError {
    ExportError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir`, returning the written files.
    pub fn export_all(
        data: &DashboardData,
        dir: &Path,
        size: (u32, u32),
        hole: f64,
    ) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let pie_path = dir.join(EVENT_TYPES_FILE);
        Self::render_event_types(&PieChart::from_event_types(&data.event_types), &pie_path, size)?;

        let donut_path = dir.join(TOP_BRANDS_FILE);
        Self::render_brand_comparison(
            &PieChart::from_ranking("Purchased", &data.purchased, hole),
            &PieChart::from_ranking("Viewed", &data.viewed, hole),
            &donut_path,
            size,
        )?;

        tracing::info!(dir = %dir.display(), "Exported charts");
        Ok(vec![pie_path, donut_path])
    }

    pub fn render_event_types(
        chart: &PieChart,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let area = root
            .titled("Event types", (FONT, 22).into_font())
            .map_err(draw_err)?;
        Self::draw_pie(&area, chart)?;
        root.present().map_err(draw_err)
    }

    pub fn render_brand_comparison(
        purchased: &PieChart,
        viewed: &PieChart,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (left, right) = root.split_horizontally(size.0 / 2);
        for (area, chart) in [(left, purchased), (right, viewed)] {
            let area = area
                .titled(&chart.name, (FONT, 20).into_font())
                .map_err(draw_err)?;
            Self::draw_pie(&area, chart)?;
        }
        root.present().map_err(draw_err)
    }

    fn draw_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        chart: &PieChart,
    ) -> Result<(), ExportError> {
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = (w.min(h) as f64 / 2.0 - 10.0).max(1.0);
        let centered = Pos::new(HPos::Center, VPos::Center);

        if chart.is_empty() {
            area.draw(&Circle::new(center, radius as i32, GRAY.stroke_width(1)))
                .map_err(draw_err)?;
            let style = (FONT, 16).into_font().color(&GRAY).pos(centered);
            return area.draw_text("No data", &style, center).map_err(draw_err);
        }

        let offset = |(x, y): (f64, f64)| (center.0 + x.round() as i32, center.1 + y.round() as i32);

        for (i, slice) in chart.slices.iter().enumerate() {
            let (r, g, b) = slice_rgb(i);
            let color = RGBColor(r, g, b);
            for piece in slice_polygons(slice, radius, chart.hole) {
                let points: Vec<(i32, i32)> = piece.into_iter().map(offset).collect();
                area.draw(&Polygon::new(points, color.filled()))
                    .map_err(draw_err)?;
            }
        }

        let style = (FONT, 12).into_font().color(&WHITE).pos(centered);
        for slice in chart.slices.iter().filter(|s| s.has_room_for_label()) {
            let (x, y) = offset(chart.label_offset(slice, radius));
            for (line_no, line) in slice.annotation().lines().enumerate() {
                area.draw_text(line, &style, (x, y - 7 + line_no as i32 * 14))
                    .map_err(draw_err)?;
            }
        }
        Ok(())
    }
}
