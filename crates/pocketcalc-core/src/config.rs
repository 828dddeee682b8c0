//! Panel geometry and drag limits.

use std::fs;
use std::path::Path;

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drag::DragBounds;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Size and placement rules for the calculator panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Panel width in viewport pixels.
    pub width: f64,
    /// Panel height used for initial placement.
    pub height: f64,
    /// Minimum distance from the top/left edge at mount.
    pub margin: f64,
    /// Gap kept below the panel at mount on short viewports.
    pub bottom_gap: f64,
    pub drag_bounds: DragBounds,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 520.0,
            margin: 50.0,
            bottom_gap: 5.0,
            drag_bounds: DragBounds::default(),
        }
    }
}

impl PanelConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Centered mount position, never above or left of `margin`.
    pub fn initial_position(&self, viewport: Size) -> Point {
        let x = ((viewport.width - self.width) / 2.0).max(self.margin);
        let centered_y = (viewport.height - self.height) / 2.0;
        let lowest_y = viewport.height - self.height - self.bottom_gap;
        let y = centered_y.min(lowest_y).max(self.margin);
        Point::new(x, y)
    }

    /// Check values that would make the panel unusable.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "panel size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.margin.is_finite() || !self.bottom_gap.is_finite() {
            return Err(ConfigError::Invalid("margins must be finite".to_string()));
        }
        Ok(())
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_initial_position_centered() {
        let config = PanelConfig::default();
        let pos = config.initial_position(Size::new(1280.0, 800.0));
        assert!((pos.x - 480.0).abs() < f64::EPSILON);
        assert!((pos.y - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_initial_position_respects_margin() {
        let config = PanelConfig::default();
        let pos = config.initial_position(Size::new(300.0, 400.0));
        assert!((pos.x - 50.0).abs() < f64::EPSILON);
        assert!((pos.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_initial_position_keeps_bottom_gap() {
        // Centered y would be 0.5 * (1050 - 520) = 265; bottom limit is 525.
        let config = PanelConfig::default();
        let pos = config.initial_position(Size::new(1280.0, 1050.0));
        assert!((pos.y - 265.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PanelConfig::from_json_str(r#"{ "width": 360 }"#).unwrap();
        assert!((config.width - 360.0).abs() < f64::EPSILON);
        assert!((config.height - 520.0).abs() < f64::EPSILON);
        assert_eq!(config.drag_bounds, DragBounds::default());
    }

    #[test]
    fn test_drag_bounds_from_json() {
        let config =
            PanelConfig::from_json_str(r#"{ "drag_bounds": { "min_y": -100 } }"#).unwrap();
        assert!((config.drag_bounds.min_y + 100.0).abs() < f64::EPSILON);
        assert!((config.drag_bounds.min_x + 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            PanelConfig::from_json_str("{ width: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_size() {
        assert!(matches!(
            PanelConfig::from_json_str(r#"{ "width": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "margin": 10 }}"#).unwrap();

        let config = PanelConfig::load(file.path()).unwrap();
        assert!((config.margin - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PanelConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = PanelConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(PanelConfig::from_json_str(&json).unwrap(), config);
    }
}
