//! eCommerce Behavior - clickstream dashboard
//!
//! Opens the desktop dashboard by default; `--summary` and `--export` run the
//! pipeline headless.

use anyhow::{Context, Result};
use clap::Parser;
use ecommerce_behavior::charts::StaticChartRenderer;
use ecommerce_behavior::config::DashboardConfig;
use ecommerce_behavior::data::pipeline;
use ecommerce_behavior::gui::DashboardApp;
use ecommerce_behavior::logging;
use eframe::egui;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecommerce-behavior", version, about = "eCommerce clickstream behavior dashboard")]
struct Args {
    /// Event CSV file (overrides the config file)
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Maximum number of rows to read
    #[arg(long)]
    rows: Option<usize>,

    /// Number of brands in each ranking
    #[arg(long)]
    top: Option<usize>,

    /// Print the dashboard data as JSON and exit
    #[arg(long)]
    summary: bool,

    /// Write the charts as PNG files into this directory and exit
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> Result<(DashboardConfig, Mode)> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(rows) = self.rows {
            config.max_rows = rows;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        config.validate()?;

        let mode = match (self.summary, self.export) {
            (true, _) => Mode::Summary,
            (false, Some(dir)) => Mode::Export(dir),
            (false, None) => Mode::Gui,
        };
        Ok((config, mode))
    }
}

enum Mode {
    Gui,
    Summary,
    Export(PathBuf),
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing("info", args.log_json || logging::json_from_env());

    let (config, mode) = args.into_config()?;
    match mode {
        Mode::Summary => {
            let data = pipeline::run(&config.pipeline_options())?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        Mode::Export(dir) => {
            let data = pipeline::run(&config.pipeline_options())?;
            let size = (config.export_width, config.export_height);
            let files =
                StaticChartRenderer::export_all(&data, &dir, size, config.donut_hole as f64)
                    .with_context(|| format!("exporting charts to {}", dir.display()))?;
            for file in files {
                println!("{}", file.display());
            }
            Ok(())
        }
        Mode::Gui => run_gui(config),
    }
}

fn run_gui(config: DashboardConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(config.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "eCommerce Behavior",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {}", e))
}
