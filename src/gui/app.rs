//! Dashboard Main Application
//! Main window with the about/actions sidebar and the chart page.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::pipeline::{self, DashboardData, PipelineOptions};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Pipeline result from background thread
enum LoadResult {
    Complete(DashboardData),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async pipeline run
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut chart_viewer = ChartViewer::new(&config.title, config.donut_hole as f64);
        if let Some(path) = &config.header_image {
            match load_texture(&cc.egui_ctx, path) {
                Ok(texture) => chart_viewer.header_image = Some(texture),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Header image not loaded"),
            }
        }

        let mut app = Self {
            control_panel: ControlPanel::new(&config.about, &config.data_source_url),
            chart_viewer,
            load_rx: None,
            is_loading: false,
            config,
        };
        let initial = app.config.data_path.clone();
        app.start_load(initial);
        app
    }

    /// Run the pipeline for `path` in a background thread
    fn start_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        self.chart_viewer.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel
            .set_status(format!("Loading {}...", path.display()));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let options = PipelineOptions {
            path,
            ..self.config.pipeline_options()
        };

        thread::spawn(move || {
            let result = match pipeline::run(&options) {
                Ok(data) => LoadResult::Complete(data),
                Err(e) => {
                    tracing::error!(error = %e, "Pipeline failed");
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for pipeline results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(data)) => {
                self.control_panel.set_status(format!(
                    "Loaded {} rows ({} after cleaning)",
                    data.loaded_rows, data.row_count
                ));
                self.control_panel.export_enabled = true;
                self.chart_viewer.set_data(data);
                self.is_loading = false;
            }
            Ok(LoadResult::Error(error)) => {
                self.control_panel.set_error(format!("Error: {}", error));
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_error("Error: loader stopped unexpectedly");
                self.is_loading = false;
            }
        }
    }

    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Render the charts as PNG files into a user-chosen folder
    fn handle_export_charts(&mut self) {
        let Some(data) = self.chart_viewer.data() else {
            self.control_panel.set_error("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let size = (self.config.export_width, self.config.export_height);
        match StaticChartRenderer::export_all(data, &dir, size, self.config.donut_hole as f64) {
            Ok(files) => {
                self.control_panel
                    .set_status(format!("Exported {} charts to {}", files.len(), dir.display()));
                if let Err(e) = open::that(&dir) {
                    tracing::debug!(error = %e, "Could not open export folder");
                }
            }
            Err(e) => {
                self.control_panel.set_error(format!("Export error: {}", e));
            }
        }
    }
}

/// Decode an image file into an egui texture
fn load_texture(ctx: &egui::Context, path: &Path) -> Result<egui::TextureHandle, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Ok(ctx.load_texture("header_image", color_image, egui::TextureOptions::default()))
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, self.is_loading) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
