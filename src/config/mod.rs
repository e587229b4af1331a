use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::schedule::DataSource;

pub const MIN_FONT_SCALE: f32 = 0.75;
pub const MAX_FONT_SCALE: f32 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File path or http(s) URL of the schedule loaded at startup.
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "default_pixels_per_hour")]
    pub pixels_per_hour: f32,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub open_after_export: bool,
}

fn default_data_source() -> String {
    "schedule.json".to_string()
}

fn default_pixels_per_hour() -> f32 {
    50.0
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            export_dir: None,
            pixels_per_hour: default_pixels_per_hour(),
            font_scale: default_font_scale(),
            open_after_export: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            Self::from_json(&contents)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    fn from_json(contents: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(contents)
            .context("Failed to parse config file")?;
        config.font_scale = config.font_scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
        if !(config.pixels_per_hour > 0.0) {
            config.pixels_per_hour = default_pixels_per_hour();
        }
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "weekgrid", "weekgrid")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }

    /// Configured export directory, else the user's downloads, else the
    /// working directory.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Multiply the font scale by a zoom gesture, keeping it in range.
    pub fn apply_zoom(&mut self, zoom_delta: f32) {
        self.font_scale = (self.font_scale * zoom_delta).clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pixels_per_hour, 50.0);
        assert_eq!(config.data_source, "schedule.json");
    }

    #[test]
    fn out_of_range_values_are_corrected() {
        let config = Config::from_json(r#"{"font_scale": 9.0, "pixels_per_hour": -3.0}"#).unwrap();
        assert_eq!(config.font_scale, MAX_FONT_SCALE);
        assert_eq!(config.pixels_per_hour, 50.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut config = Config::default();
        config.apply_zoom(0.1);
        assert_eq!(config.font_scale, MIN_FONT_SCALE);
        config.apply_zoom(100.0);
        assert_eq!(config.font_scale, MAX_FONT_SCALE);
    }

    #[test]
    fn explicit_export_dir_wins() {
        let config = Config {
            export_dir: Some(PathBuf::from("/tmp/exports")),
            ..Config::default()
        };
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn url_sources_are_recognised() {
        let config = Config {
            data_source: "https://example.com/schedule.json".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.data_source(), DataSource::Url(_)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(Config::from_json("not json").is_err());
    }
}
