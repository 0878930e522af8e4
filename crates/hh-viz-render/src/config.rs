use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::path::PathBuf;

use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub experiment: ExperimentConfig,
    pub output: OutputConfig,
    pub heatmap: HeatmapConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Hh4b.base_config()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 576.0,  // 8" * 72
            height: 504.0, // 7" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    /// CSS font-family list written into the SVG.
    pub family: String,
    /// Extra font files loaded for PNG/PDF conversion, on top of system fonts.
    pub files: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            label_size: 12.0,
            tick_size: 9.0,
            family: "DejaVu Sans, Arial, Helvetica, sans-serif".into(),
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub status: String,
    pub sqrt_s_tev: f64,
    pub lumi_fb_inv: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "CMS".into(),
            status: "Preliminary".into(),
            sqrt_s_tev: 13.6,
            lumi_fb_inv: 61.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Formats written by `save_heatmap`, in order.
    pub formats: Vec<String>,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { formats: vec!["png".into(), "pdf".into()], dpi: 220 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub cmap: String,
    /// Colour scale lower edge = min(valid) * vmin_scale.
    pub vmin_scale: f64,
    /// Colour scale upper edge = max(valid) * vmax_scale.
    pub vmax_scale: f64,
    pub annotate: bool,
    pub annot_fontsize: f64,
    pub annot_decimals: usize,
    /// Fill of cells without a qualifying record.
    pub mask_color: Color,
    /// Outline of the selected working point(s).
    pub highlight_color: Color,
    pub show_colorbar: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            cmap: "viridis".into(),
            vmin_scale: 0.75,
            vmax_scale: 1.25,
            annotate: true,
            annot_fontsize: 7.0,
            annot_decimals: 1,
            mask_color: Color::hex("#FFFFFF"),
            highlight_color: Color::hex("#DC2626"),
            show_colorbar: true,
        }
    }
}

/// Resolve a VizConfig from optional YAML string.
/// Priority: user YAML overrides → base config of the requested theme.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml else {
        return Ok(VizConfig::default());
    };
    let user: Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    if user.is_null() {
        return Ok(VizConfig::default());
    }
    let theme = user.get("theme").and_then(Value::as_str).unwrap_or("hh4b");
    resolve_value(BuiltinTheme::parse(theme), user)
}

/// Overlay an already-parsed YAML value onto a theme's base config.
pub fn resolve_value(theme: BuiltinTheme, user: Value) -> crate::Result<VizConfig> {
    let mut base = serde_yaml_ng::to_value(theme.base_config())
        .map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge_yaml(&mut base, user);
    serde_yaml_ng::from_value(base).map_err(|e| crate::RenderError::Config(e.to_string()))
}

fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(slot) => merge_yaml(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}
