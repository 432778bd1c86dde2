/// TOML configuration for the terminal renderer
use anyhow::{bail, Context};
use crossterm::style::Color;
use serde::Deserialize;
use std::path::Path;
use wire3d_core::{obj::DEFAULT_TARGET_SIZE, Camera};

use crate::renderer::{ShadeRamp, Shading, DEFAULT_RAMP};

/// Smallest accepted projection depth clamp
pub const MIN_DEPTH_FLOOR: f32 = 1e-3;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub camera: Camera,
    pub shading: ShadingConfig,
    pub animation: AnimationConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadingConfig {
    /// Glyphs from faintest to boldest
    pub ramp: String,
    pub background: char,
    /// Ramp steps per unit of depth
    pub density: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            ramp: DEFAULT_RAMP.to_string(),
            background: ' ',
            density: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Radians added to the X angle each frame
    pub delta_x: f32,
    /// Radians added to the Y angle each frame
    pub delta_y: f32,
    pub frame_interval_ms: u64,
    pub clear_between_frames: bool,
    /// Foreground color name, e.g. "red"
    pub color: Option<String>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            delta_x: 0.02,
            delta_y: 0.05,
            frame_interval_ms: 5,
            clear_between_frames: false,
            color: None,
        }
    }
}

impl AnimationConfig {
    pub fn foreground(&self) -> anyhow::Result<Option<Color>> {
        self.color
            .as_deref()
            .map(|name| {
                Color::try_from(name).map_err(|_| anyhow::anyhow!("unknown color name {name:?}"))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Largest extent of a loaded model after normalization
    pub target_size: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let camera = &self.camera;
        if camera.width == 0 || camera.height == 0 {
            bail!("viewport must be at least 1x1, got {}x{}", camera.width, camera.height);
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            bail!("fov_degrees must be in (0, 180), got {}", camera.fov_degrees);
        }
        if !(camera.min_depth >= MIN_DEPTH_FLOOR && camera.min_depth.is_finite()) {
            bail!("min_depth must be at least {MIN_DEPTH_FLOOR}, got {}", camera.min_depth);
        }
        if !camera.camera_distance.is_finite() || !camera.size.is_finite() {
            bail!("camera_distance and size must be finite");
        }
        if self.shading.ramp.is_empty() {
            bail!("shading ramp must contain at least one glyph");
        }
        if !(self.shading.density > 0.0 && self.shading.density.is_finite()) {
            bail!("shading density must be positive, got {}", self.shading.density);
        }
        if !(self.model.target_size > 0.0 && self.model.target_size.is_finite()) {
            bail!("target_size must be positive, got {}", self.model.target_size);
        }
        self.animation.foreground()?;
        Ok(())
    }

    /// Depth shading derived from this config; the ramp center sits at the camera distance
    pub fn build_shading(&self) -> anyhow::Result<Shading> {
        let ramp = ShadeRamp::new(&self.shading.ramp).context("shading ramp is empty")?;
        Ok(Shading::new(
            ramp,
            self.shading.background,
            self.shading.density,
            self.camera.camera_distance,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!((config.camera.width, config.camera.height), (80, 40));
        assert_eq!(config.camera.fov_degrees, 90.0);
        assert_eq!(config.camera.camera_distance, 3.0);
        assert_eq!(config.shading.ramp, ".:-=+*#%@");
        assert_eq!(config.animation.frame_interval_ms, 5);
        assert_eq!(config.model.target_size, 4.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [camera]
            width = 120
            fov_degrees = 60.0

            [shading]
            ramp = "-+#"
            background = "."

            [animation]
            color = "red"
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.width, 120);
        assert_eq!(config.camera.height, 40);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.shading.background, '.');
        assert_eq!(config.animation.foreground().unwrap(), Some(Color::Red));
        assert_eq!(config.build_shading().unwrap().ramp.len(), 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_toml_str("[camera]\nwidth = 0").is_err());
        assert!(Config::from_toml_str("[camera]\nfov_degrees = 180.0").is_err());
        assert!(Config::from_toml_str("[camera]\nmin_depth = 0.0").is_err());
        assert!(Config::from_toml_str("[camera]\nmin_depth = 1e-30").is_err());
        assert!(Config::from_toml_str("[camera]\nmin_depth = 0.01").is_ok());
        assert!(Config::from_toml_str("[shading]\ndensity = 0.0").is_err());
        assert!(Config::from_toml_str("[shading]\ndensity = -2.0").is_err());
        assert!(Config::from_toml_str("[shading]\nramp = \"\"").is_err());
        assert!(Config::from_toml_str("[animation]\ncolor = \"ultraviolet\"").is_err());
        assert!(Config::from_toml_str("[model]\ntarget_size = -1.0").is_err());
        assert!(Config::from_toml_str("[camera]\nzoom = 2.0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\ndelta_x = 0.1\nframe_interval_ms = 16").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.animation.delta_x, 0.1);
        assert_eq!(config.animation.frame_interval_ms, 16);
    }

    #[test]
    fn test_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("none.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
