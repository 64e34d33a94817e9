//! Configuration management for the price predictor

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppInfo,
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application identity shown in the banner and footer
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Date the underlying resale data was last refreshed
    pub last_updated: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "HDB Resale Price Predictor".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Predict HDB resale prices using machine learning".to_string(),
            last_updated: "30-06-2025".to_string(),
        }
    }
}

/// Artifact file locations
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Gradient-boosted regressor exported to ONNX
    pub model_path: String,
    /// Fitted scaler export
    pub scaler_path: String,
    /// Town → coordinates table
    pub postal_data_path: String,
    /// Intra-op threads for ONNX Runtime
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: "model.onnx".to_string(),
            scaler_path: "scaler.json".to_string(),
            postal_data_path: "postal_data.json".to_string(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

/// Externally hosted transaction map
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub url: String,
    /// Embed height in pixels
    #[serde(default = "default_map_height")]
    pub height: u32,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

fn default_map_height() -> u32 {
    600
}

fn default_zoom() -> u8 {
    11
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            url: "https://your-username.github.io/hdb-resale-map/hdb_resale_price_map_clickable.html"
                .to_string(),
            height: default_map_height(),
            default_zoom: default_zoom(),
        }
    }
}

/// Feature computation settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionConfig {
    /// Year to compute remaining lease against; unset means the current year
    #[serde(default)]
    pub lease_reference_year: Option<i32>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path, overridden by `HDB__`-prefixed
    /// environment variables (e.g. `HDB__ARTIFACTS__MODEL_PATH`)
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("HDB").prefix_separator("__").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
