//! TOML configuration for the signing CLI
//!
//! Every section and field is optional:
//!
//! ```toml
//! [placement]
//! min_width = 60.0
//! handle_radius = 10.0
//! initial_rect = { x = 40.0, y = 600.0, width = 180.0, height = 60.0 }
//!
//! [display]
//! max_width = 1024.0
//! ```

use anyhow::{ensure, Context};
use docsign_core::PlacementConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overlay sizing and hit-testing
    #[serde(default)]
    pub placement: PlacementConfig,
    /// How the document is laid out on screen when no viewport is given
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let placement = &self.placement;
        ensure!(
            positive(self.display.max_width),
            "display.max_width must be a positive number, got {}",
            self.display.max_width
        );
        ensure!(
            positive(placement.min_width) && positive(placement.min_height),
            "placement.min_width and placement.min_height must be positive, got {}x{}",
            placement.min_width,
            placement.min_height
        );
        ensure!(
            placement.handle_radius.is_finite() && placement.handle_radius >= 0.0,
            "placement.handle_radius must be zero or more, got {}",
            placement.handle_radius
        );

        let rect = placement.initial_rect;
        ensure!(
            rect.x.is_finite() && rect.y.is_finite() && positive(rect.width) && positive(rect.height),
            "placement.initial_rect must have a finite origin and positive size, got {:?}",
            rect
        );
        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Widest the page or image is drawn on screen (default: 800)
    #[serde(default = "default_max_width")]
    pub max_width: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
        }
    }
}

fn default_max_width() -> f64 {
    800.0
}
