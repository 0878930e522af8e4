//! `hhscan scan` configuration file and flag overlay.

use anyhow::{Context, Result, bail};
use hh_core::CutBounds;
use hh_scan::npz::DEFAULT_MASS_WINDOW;
use hh_scan::{AggregateOptions, MissingRecordPolicy, Quantity, ValidityThresholds};
use hh_viz_render::config::{VizConfig, resolve_value};
use hh_viz_render::theme::BuiltinTheme;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory holding the input archive; plots are written here too.
    pub plot_dir: Option<PathBuf>,
    pub category: Option<String>,
    /// Explicit archive path. Defaults to the name derived from `plot_dir`,
    /// `category` and `mass_window`.
    pub input: Option<PathBuf>,
    pub mass_window: String,
    pub bdt_min: Option<f64>,
    pub bdt_max: Option<f64>,
    pub xbb_min: Option<f64>,
    pub xbb_max: Option<f64>,
    pub thresholds: ValidityThresholds,
    /// Leave cells without a matching record empty instead of failing.
    pub allow_missing: bool,
    pub quantities: Vec<Quantity>,
    pub show: bool,
    pub annot_fontsize: Option<f64>,
    /// Renderer overrides, merged over the selected theme.
    pub viz: Option<serde_yaml_ng::Value>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            plot_dir: None,
            category: None,
            input: None,
            mass_window: DEFAULT_MASS_WINDOW.to_string(),
            bdt_min: None,
            bdt_max: None,
            xbb_min: None,
            xbb_max: None,
            thresholds: ValidityThresholds::default(),
            allow_missing: false,
            quantities: Quantity::ALL.to_vec(),
            show: false,
            annot_fontsize: None,
            viz: None,
        }
    }
}

pub fn read_scan_config(path: &Path) -> Result<ScanConfig> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: ScanConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        serde_yaml_ng::from_slice(&bytes)?
    };
    Ok(cfg)
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub plot_dir: Option<PathBuf>,
    pub category: Option<String>,
    pub input: Option<PathBuf>,
    pub bdt_min: Option<f64>,
    pub bdt_max: Option<f64>,
    pub xbb_min: Option<f64>,
    pub xbb_max: Option<f64>,
    pub annot_fontsize: Option<f64>,
    pub allow_missing: bool,
    pub show: bool,
}

/// Fully resolved settings for one scan.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub plot_dir: PathBuf,
    pub category: String,
    pub input: PathBuf,
    pub mass_window: String,
    pub bdt_bounds: CutBounds,
    pub xbb_bounds: CutBounds,
    pub options: AggregateOptions,
    pub quantities: Vec<Quantity>,
    pub show: bool,
    pub viz: VizConfig,
}

impl ScanConfig {
    pub fn resolve(self, cli: ScanOverrides) -> Result<ScanSettings> {
        let plot_dir = cli.plot_dir.or(self.plot_dir).unwrap_or_else(|| PathBuf::from("."));
        let Some(category) = cli.category.or(self.category) else {
            bail!("no category given (use --category or set `category` in the config)");
        };
        if category.is_empty() {
            bail!("category must not be empty");
        }
        let input = cli
            .input
            .or(self.input)
            .unwrap_or_else(|| hh_scan::fom_arrays_path(&plot_dir, &category, &self.mass_window));

        let bdt_bounds = bounds(cli.bdt_min.or(self.bdt_min), cli.bdt_max.or(self.bdt_max))
            .context("BDT bounds")?;
        let xbb_bounds = bounds(cli.xbb_min.or(self.xbb_min), cli.xbb_max.or(self.xbb_max))
            .context("Xbb bounds")?;

        let missing = if cli.allow_missing || self.allow_missing {
            MissingRecordPolicy::Empty
        } else {
            MissingRecordPolicy::Fail
        };

        let mut viz = match self.viz {
            Some(value) => {
                let theme = value.get("theme").and_then(|v| v.as_str()).unwrap_or("hh4b");
                resolve_value(BuiltinTheme::parse(theme), value)?
            }
            None => VizConfig::default(),
        };
        if let Some(size) = cli.annot_fontsize.or(self.annot_fontsize) {
            if !size.is_finite() || size <= 0.0 {
                bail!("annot_fontsize must be positive, got {size}");
            }
            viz.heatmap.annot_fontsize = size;
        }

        let mut quantities = self.quantities;
        let mut seen = Vec::with_capacity(quantities.len());
        quantities.retain(|q| {
            let fresh = !seen.contains(q);
            seen.push(*q);
            fresh
        });
        if quantities.is_empty() {
            bail!("no quantities to plot (`quantities` is empty)");
        }

        Ok(ScanSettings {
            plot_dir,
            category,
            input,
            mass_window: self.mass_window,
            bdt_bounds,
            xbb_bounds,
            options: AggregateOptions { thresholds: self.thresholds, missing },
            quantities,
            show: cli.show || self.show,
            viz,
        })
    }
}

fn bounds(min: Option<f64>, max: Option<f64>) -> Result<CutBounds> {
    Ok(CutBounds::new(min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY))?)
}
