//! Dashboard configuration, read from an optional JSON file.

use crate::data::{PipelineOptions, DEFAULT_MAX_ROWS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_PATH: &str = "data/2019-Nov.csv";
pub const DEFAULT_TITLE: &str = "ECommerce_behavior";
pub const DEFAULT_ABOUT: &str = "Visualization & Analyze data about e-commerce customer behavior.";
pub const DEFAULT_DATA_SOURCE_URL: &str =
    "https://www.kaggle.com/datasets/mkechinov/ecommerce-behavior-data-from-multi-category-store";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// User settings for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub max_rows: usize,
    pub preview_rows: usize,
    pub top_n: usize,
    pub title: String,
    pub header_image: Option<PathBuf>,
    pub about: String,
    pub data_source_url: String,
    /// Inner radius of the brand donuts as a fraction of the outer radius
    pub donut_hole: f32,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            max_rows: DEFAULT_MAX_ROWS,
            preview_rows: 10,
            top_n: 10,
            title: DEFAULT_TITLE.to_string(),
            header_image: None,
            about: DEFAULT_ABOUT.to_string(),
            data_source_url: DEFAULT_DATA_SOURCE_URL.to_string(),
            donut_hole: 0.4,
            export_width: 1000,
            export_height: 500,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=0.9).contains(&self.donut_hole) {
            return Err(ConfigError::Invalid {
                field: "donut_hole",
                reason: format!("{} is outside 0.0..=0.9", self.donut_hole),
            });
        }
        if self.export_width < 200 || self.export_height < 200 {
            return Err(ConfigError::Invalid {
                field: "export_width/export_height",
                reason: format!(
                    "{}x{} is smaller than 200x200",
                    self.export_width, self.export_height
                ),
            });
        }
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            path: self.data_path.clone(),
            max_rows: self.max_rows,
            preview_rows: self.preview_rows,
            top_n: self.top_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_rows": 500, "title": "Nov 2019" }}"#).unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.max_rows, 500);
        assert_eq!(config.title, "Nov 2019");
        assert_eq!(config.top_n, 10);
        assert_eq!(config.donut_hole, 0.4);
    }

    #[test]
    fn rejects_out_of_range_hole() {
        let config = DashboardConfig {
            donut_hole: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "donut_hole", .. })
        ));
    }

    #[test]
    fn bad_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
