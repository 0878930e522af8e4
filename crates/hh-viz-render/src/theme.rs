use crate::config::{ExperimentConfig, FigureConfig, FontConfig, HeatmapConfig, VizConfig};

/// Named starting points for [`VizConfig`]; user YAML is merged on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuiltinTheme {
    /// Analysis default: 8"×7" figure, CMS Preliminary header.
    #[default]
    Hh4b,
    /// Square figure with larger type for publication.
    Cms,
    /// Small figure without an experiment header.
    Minimal,
}

impl BuiltinTheme {
    /// Unknown names fall back to [`BuiltinTheme::Hh4b`].
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("cms") {
            Self::Cms
        } else if s.eq_ignore_ascii_case("minimal") {
            Self::Minimal
        } else {
            Self::Hh4b
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hh4b => "hh4b",
            Self::Cms => "cms",
            Self::Minimal => "minimal",
        }
    }

    pub fn base_config(self) -> VizConfig {
        let mut cfg = VizConfig {
            theme: self.name().to_string(),
            figure: FigureConfig::default(),
            font: FontConfig::default(),
            experiment: ExperimentConfig::default(),
            output: Default::default(),
            heatmap: HeatmapConfig::default(),
        };
        match self {
            Self::Hh4b => {}
            Self::Cms => {
                cfg.figure = FigureConfig { width: 720.0, height: 720.0 };
                cfg.font.size = 11.0;
                cfg.font.label_size = 14.0;
                cfg.font.tick_size = 10.5;
                cfg.heatmap.annot_fontsize = 8.5;
            }
            Self::Minimal => {
                cfg.figure = FigureConfig { width: 432.0, height: 378.0 };
                cfg.font.size = 9.0;
                cfg.font.label_size = 10.0;
                cfg.font.tick_size = 8.0;
                cfg.experiment = ExperimentConfig {
                    name: String::new(),
                    status: String::new(),
                    sqrt_s_tev: 0.0,
                    lumi_fb_inv: 0.0,
                };
            }
        }
        cfg
    }
}
