//! Chart Viewer Widget
//! Central scrollable page: title, header image, data preview, event-type
//! pie and the purchased vs. viewed brand donuts.

use crate::charts::{ChartPlotter, PieChart};
use crate::data::schema::EVENT_COLUMNS;
use crate::data::{DashboardData, EventRecord};
use egui::{RichText, ScrollArea, TextureHandle};

const PIE_SIZE: f32 = 360.0;
const DONUT_SIZE: f32 = 320.0;

/// Charts derived from the current `DashboardData`.
struct Charts {
    event_types: PieChart,
    purchased: PieChart,
    viewed: PieChart,
}

pub struct ChartViewer {
    pub title: String,
    pub header_image: Option<TextureHandle>,
    hole: f64,
    data: Option<DashboardData>,
    charts: Option<Charts>,
}

impl ChartViewer {
    pub fn new(title: impl Into<String>, hole: f64) -> Self {
        Self {
            title: title.into(),
            header_image: None,
            hole,
            data: None,
            charts: None,
        }
    }

    pub fn clear(&mut self) {
        self.data = None;
        self.charts = None;
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    /// Replace the displayed data and rebuild chart geometry
    pub fn set_data(&mut self, data: DashboardData) {
        self.charts = Some(Charts {
            event_types: PieChart::from_event_types(&data.event_types),
            purchased: PieChart::from_ranking("Purchased", &data.purchased, self.hole),
            viewed: PieChart::from_ranking("Viewed", &data.viewed, self.hole),
        });
        self.data = Some(data);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(&self.title).size(32.0).strong());
                if let Some(texture) = &self.header_image {
                    ui.add(egui::Image::new(texture).max_width(ui.available_width()));
                }
                ui.add_space(10.0);

                ui.label(
                    RichText::new("eCommerce behavior data from multi category store")
                        .size(24.0)
                        .strong(),
                );
                ui.add_space(8.0);

                let (Some(data), Some(charts)) = (&self.data, &self.charts) else {
                    ui.label(RichText::new("No Data").size(20.0));
                    return;
                };

                Self::draw_summary(ui, data);
                ui.add_space(8.0);
                Self::draw_preview(ui, &data.preview);
                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    ChartPlotter::draw_pie(ui, &charts.event_types, PIE_SIZE);
                    ui.vertical(|ui| ChartPlotter::draw_legend(ui, &charts.event_types));
                });

                ui.add_space(20.0);
                ui.label(
                    RichText::new("Top 10 brand that most customer purchased vs. view")
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    for chart in [&charts.purchased, &charts.viewed] {
                        ui.vertical(|ui| {
                            ui.set_width(DONUT_SIZE + 160.0);
                            ui.label(RichText::new(&chart.name).size(16.0).strong());
                            ui.horizontal(|ui| {
                                ChartPlotter::draw_pie(ui, chart, DONUT_SIZE);
                                ui.vertical(|ui| ChartPlotter::draw_legend(ui, chart));
                            });
                        });
                    }
                });
            });
    }

    fn draw_summary(ui: &mut egui::Ui, data: &DashboardData) {
        ui.label(
            RichText::new(format!(
                "{} rows loaded, {} duplicates, {} rows after cleaning",
                data.loaded_rows, data.duplicate_rows, data.row_count
            ))
            .size(12.0)
            .color(egui::Color32::GRAY),
        );
        for warning in &data.warnings {
            ui.label(
                RichText::new(format!("⚠ {}", warning))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(243, 156, 18)),
            );
        }
    }

    fn draw_preview(ui: &mut egui::Ui, rows: &[EventRecord]) {
        ScrollArea::horizontal()
            .id_salt("preview")
            .show(ui, |ui| {
                egui::Grid::new("preview_grid")
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").strong());
                        for name in EVENT_COLUMNS {
                            ui.label(RichText::new(name).strong());
                        }
                        ui.end_row();

                        for (i, row) in rows.iter().enumerate() {
                            ui.label(RichText::new(i.to_string()).weak());
                            for cell in preview_cells(row) {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Cell text for one preview row, in `EVENT_COLUMNS` order.
fn preview_cells(row: &EventRecord) -> [String; 9] {
    [
        row.event_time.clone(),
        row.event_type.clone(),
        row.product_id.to_string(),
        row.category_id.to_string(),
        row.category_code.clone().unwrap_or_default(),
        row.brand.clone().unwrap_or_default(),
        format!("{:.2}", row.price),
        row.user_id.to_string(),
        row.user_session.clone(),
    ]
}
