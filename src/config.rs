//! Host configuration for a hydrograph widget.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FloodvizError;

/// Space reserved around the plot for axes, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 30,
            right: 20,
            bottom: 30,
            left: 50,
        }
    }
}

/// Construction parameters supplied by the embedding page or binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Outer width in pixels, margins included.
    pub width: u32,
    /// Outer height in pixels, margins included.
    pub height: u32,
    /// Mount point of the chart (a CSS selector in the browser build).
    #[serde(alias = "div_id")]
    pub mount: String,
    /// Local path or `http(s)://` URL of the sample JSON.
    pub data_path: String,
    /// Site keys visible at start-up.
    pub display_ids: Vec<String>,
    pub margin: Margin,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 500,
            mount: "#hydrograph".into(),
            data_path: String::new(),
            display_ids: Vec::new(),
            margin: Margin::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: ChartConfig = serde_json::from_str(&txt)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject sizes where the margins swallow the whole plot.
    pub fn validate(&self) -> Result<(), FloodvizError> {
        let horizontal = self.margin.left.saturating_add(self.margin.right);
        if self.width <= horizontal {
            return Err(FloodvizError::TooSmall {
                dimension: "width",
                value: self.width,
                margins: horizontal,
            });
        }
        let vertical = self.margin.top.saturating_add(self.margin.bottom);
        if self.height <= vertical {
            return Err(FloodvizError::TooSmall {
                dimension: "height",
                value: self.height,
                margins: vertical,
            });
        }
        Ok(())
    }

    /// Plot width without margins.
    pub fn inner_width(&self) -> f64 {
        self.width.saturating_sub(self.margin.left.saturating_add(self.margin.right)) as f64
    }

    /// Plot height without margins.
    pub fn inner_height(&self) -> f64 {
        self.height.saturating_sub(self.margin.top.saturating_add(self.margin.bottom)) as f64
    }

    /// Convert outer (canvas) coordinates into plot-local ones.
    pub fn to_plot(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.margin.left as f64, y - self.margin.top as f64)
    }

    /// Convert plot-local coordinates back into outer (canvas) ones.
    pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.margin.left as f64, y + self.margin.top as f64)
    }
}

/// Split a user-supplied id list on commas or semicolons.
pub fn parse_id_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hydrograph_margins() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.margin, Margin { top: 30, right: 20, bottom: 30, left: 50 });
        assert_eq!(cfg.inner_width(), 890.0);
        assert_eq!(cfg.inner_height(), 440.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn too_small_is_rejected() {
        let cfg = ChartConfig {
            width: 70,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(FloodvizError::TooSmall { dimension: "width", .. })
        ));
    }

    #[test]
    fn oversized_margins_are_rejected() {
        let cfg: ChartConfig = serde_json::from_str(
            r#"{"margin": {"top": 30, "right": 4294967295, "bottom": 4294967295, "left": 50}}"#,
        )
        .unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(FloodvizError::TooSmall { dimension: "width", margins: u32::MAX, .. })
        ));
        assert_eq!(cfg.inner_width(), 0.0);
        assert_eq!(cfg.inner_height(), 0.0);
    }

    #[test]
    fn div_id_alias_and_partial_json() {
        let cfg: ChartConfig = serde_json::from_str(
            r##"{"div_id": "#hydro", "display_ids": ["01646500"], "height": 300}"##,
        )
        .unwrap();
        assert_eq!(cfg.mount, "#hydro");
        assert_eq!(cfg.height, 300);
        assert_eq!(cfg.width, 960);
        assert_eq!(cfg.display_ids, vec!["01646500"]);
    }

    #[test]
    fn parse_list_handles_mixed_separators() {
        assert_eq!(parse_id_list("A, B;C,,"), vec!["A", "B", "C"]);
        assert!(parse_id_list(" ; ").is_empty());
    }

    #[test]
    fn canvas_round_trip() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.to_plot(50.0, 30.0), (0.0, 0.0));
        assert_eq!(cfg.to_canvas(0.0, 0.0), (50.0, 30.0));
    }
}
