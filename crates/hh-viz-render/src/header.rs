use crate::canvas::Canvas;
use crate::config::{ExperimentConfig, VizConfig};
use crate::layout::margins::PlotArea;
use crate::primitives::{Anchor, TextStyle};

/// Right-hand run label, e.g. `61.9 fb⁻¹ (13.6 TeV)`. Empty when neither is set.
pub fn run_label(experiment: &ExperimentConfig) -> String {
    let lumi = (experiment.lumi_fb_inv > 0.0)
        .then(|| format!("{} fb\u{207B}\u{00B9}", experiment.lumi_fb_inv));
    let energy = (experiment.sqrt_s_tev > 0.0).then(|| format!("({} TeV)", experiment.sqrt_s_tev));
    [lumi, energy].into_iter().flatten().collect::<Vec<_>>().join(" ")
}

/// Experiment label above the plot area: bold name, italic status on the
/// left, run label flush right. Nothing is drawn without an experiment name.
pub fn draw_experiment_header(canvas: &mut Canvas, area: &PlotArea, config: &VizConfig) {
    let exp = &config.experiment;
    if exp.name.is_empty() {
        return;
    }
    let y = area.top - 6.0;
    let size = config.font.label_size * 1.3;

    let name_style = TextStyle::new(size).bold();
    canvas.text(area.left, y, &exp.name, &name_style);
    let name_w = canvas.measure_text(&exp.name, &name_style).width;
    canvas.text(area.left + name_w + 5.0, y, &exp.status, &TextStyle::new(size * 0.85).italic());

    let run_style = TextStyle::new(config.font.tick_size * 1.1).anchor(Anchor::End);
    canvas.text(area.right(), y, &run_label(exp), &run_style);
}

/// Vertical space the header needs above the plot area.
pub fn header_height(config: &VizConfig) -> f64 {
    if config.experiment.name.is_empty() { 12.0 } else { config.font.label_size * 1.3 + 14.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_label_skips_unset_parts() {
        let mut exp = ExperimentConfig::default();
        assert_eq!(run_label(&exp), "61.9 fb\u{207B}\u{00B9} (13.6 TeV)");
        exp.lumi_fb_inv = 0.0;
        assert_eq!(run_label(&exp), "(13.6 TeV)");
        exp.sqrt_s_tev = 0.0;
        assert!(run_label(&exp).is_empty());
    }
}
