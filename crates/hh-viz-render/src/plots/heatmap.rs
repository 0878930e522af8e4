use hh_scan::HeatmapArtifact;

use crate::canvas::Canvas;
use crate::color::{self, Color};
use crate::config::{HeatmapConfig, VizConfig};
use crate::header::{draw_experiment_header, header_height};
use crate::layout::margins::{Margins, PlotArea};
use crate::primitives::{Anchor, Baseline, LineStyle, Style, TextStyle};

const COLORBAR_GAP: f64 = 12.0;
const COLORBAR_W: f64 = 16.0;
const COLORBAR_STEPS: usize = 64;

/// Colour scale edges from the filled cells: `[min * vmin_scale, max * vmax_scale]`.
///
/// Falls back to a symmetric pad when the scaled interval is empty or
/// inverted (negative or constant values).
pub fn color_range(artifact: &HeatmapArtifact, cfg: &HeatmapConfig) -> Option<(f64, f64)> {
    let (lo, hi) = artifact.z.iter().flatten().flatten().filter(|v| v.is_finite()).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &v| (lo.min(v), hi.max(v)),
    );
    if lo > hi {
        return None;
    }
    let (vmin, vmax) = (lo * cfg.vmin_scale, hi * cfg.vmax_scale);
    if vmax > vmin && vmin <= lo && vmax >= hi {
        return Some((vmin, vmax));
    }
    let pad = if lo.abs() > 0.0 { lo.abs() * 0.25 } else { 1.0 };
    Some((lo - pad, hi + pad))
}

/// Shortest decimal rendering of a cut value, at most 4 decimals.
pub fn format_cut(v: f64) -> String {
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn render(artifact: &HeatmapArtifact, config: &VizConfig) -> crate::Result<String> {
    let n_x = artifact.x_values.len();
    let n_y = artifact.y_values.len();
    if n_x == 0 || n_y == 0 {
        return Err(crate::RenderError::Layout(format!("heatmap has no cells ({n_x}x{n_y})")));
    }
    let hm = &config.heatmap;
    let cmap = color::colormap(&hm.cmap);
    let range = color_range(artifact, hm);
    if range.is_none() {
        tracing::warn!(title = %artifact.title, "heatmap has no filled cells");
    }

    let x_labels: Vec<String> = artifact.x_values.iter().map(|&v| format_cut(v)).collect();
    let y_labels: Vec<String> = artifact.y_values.iter().map(|&v| format_cut(v)).collect();

    let tick_style = TextStyle::new(config.font.tick_size);
    let max_y_label_w = y_labels
        .iter()
        .map(|l| crate::text::measure_text(l, &tick_style).width)
        .fold(0.0_f64, f64::max);
    let max_x_label_w = x_labels
        .iter()
        .map(|l| crate::text::measure_text(l, &tick_style).width)
        .fold(0.0_f64, f64::max);

    let title_h = if artifact.title.is_empty() { 0.0 } else { config.font.label_size + 10.0 };
    let top = 10.0 + title_h + header_height(config);
    let left = 18.0 + config.font.label_size + max_y_label_w + 8.0;
    let right = if hm.show_colorbar {
        let tick_w = config.font.tick_size * 3.5;
        COLORBAR_GAP + COLORBAR_W + 6.0 + tick_w + config.font.label_size + 14.0
    } else {
        15.0
    };

    // Provisional width decides whether x labels must be rotated.
    let provisional_w = config.figure.width - left - right;
    let rotate_x = max_x_label_w + 4.0 > provisional_w / n_x as f64;
    let x_label_h = if rotate_x { max_x_label_w * 0.75 + 6.0 } else { config.font.tick_size + 6.0 };
    let bottom = 14.0 + x_label_h + config.font.label_size + 10.0;

    let mut canvas = Canvas::new(config.figure.width, config.figure.height, &config.font.family);
    let area = PlotArea::within(canvas.width, canvas.height, &Margins { left, top, right, bottom });
    let cell_w = area.width / n_x as f64;
    let cell_h = area.height / n_y as f64;

    if !artifact.title.is_empty() {
        let title_style = TextStyle::new(config.font.label_size).bold().anchor(Anchor::Middle);
        canvas.text(area.center_x(), 10.0 + config.font.label_size, &artifact.title, &title_style);
    }
    draw_experiment_header(&mut canvas, &area, config);

    // Cells: x = BDT column, y = Xbb row, Xbb increasing upwards.
    let cell_top = |j: usize| area.bottom() - (j as f64 + 1.0) * cell_h;
    for (i, column) in artifact.z.iter().enumerate() {
        for (j, cell) in column.iter().enumerate() {
            let x = area.left + i as f64 * cell_w;
            let y = cell_top(j);
            let value = cell.filter(|v| v.is_finite());
            let (Some(v), Some((vmin, vmax))) = (value, range) else {
                canvas.rect(x, y, cell_w, cell_h, &Style::fill(hm.mask_color));
                continue;
            };
            let fill = cmap((v - vmin) / (vmax - vmin));
            canvas.rect(x, y, cell_w, cell_h, &Style::fill(fill));

            if hm.annotate {
                let text_color = if fill.luminance() < 0.5 {
                    Color::rgb(255, 255, 255)
                } else {
                    Color::rgb(0, 0, 0)
                };
                let annot_style = TextStyle::new(hm.annot_fontsize).color(text_color).centered();
                let label = format!("{:.*}", hm.annot_decimals, v);
                canvas.text(x + cell_w / 2.0, y + cell_h / 2.0, &label, &annot_style);
            }
        }
    }

    for &[i, j] in &artifact.highlight {
        let inset = 1.0;
        canvas.rect(
            area.left + i as f64 * cell_w + inset,
            cell_top(j) + inset,
            cell_w - 2.0 * inset,
            cell_h - 2.0 * inset,
            &Style::outline(hm.highlight_color, 2.0),
        );
    }

    canvas.frame(area.left, area.top, area.width, area.height, &LineStyle::black(0.8));

    // X tick labels at cell centres
    let x_tick_style = if rotate_x {
        tick_style.anchor(Anchor::End).baseline(Baseline::Central)
    } else {
        tick_style.anchor(Anchor::Middle).baseline(Baseline::Hanging)
    };
    let tick_line = LineStyle::black(0.6);
    for (i, label) in x_labels.iter().enumerate() {
        let px = area.left + (i as f64 + 0.5) * cell_w;
        canvas.line(px, area.bottom(), px, area.bottom() + 3.0, &tick_line);
        if rotate_x {
            canvas.text_rotated(px, area.bottom() + 6.0, label, &x_tick_style, -45.0);
        } else {
            canvas.text(px, area.bottom() + 5.0, label, &x_tick_style);
        }
    }

    // Y tick labels at cell centres
    let y_tick_style = tick_style.anchor(Anchor::End).baseline(Baseline::Central);
    for (j, label) in y_labels.iter().enumerate() {
        let py = cell_top(j) + cell_h / 2.0;
        canvas.line(area.left - 3.0, py, area.left, py, &tick_line);
        canvas.text(area.left - 5.0, py, label, &y_tick_style);
    }

    // Axis labels
    let label_style = TextStyle::new(config.font.label_size).anchor(Anchor::Middle);
    canvas.text(
        area.center_x(),
        area.bottom() + 8.0 + x_label_h + config.font.label_size,
        &artifact.x_label,
        &label_style,
    );
    canvas.text_rotated(
        area.left - max_y_label_w - 14.0,
        area.center_y(),
        &artifact.y_label,
        &label_style,
        -90.0,
    );

    if hm.show_colorbar {
        draw_colorbar(&mut canvas, &area, artifact, config, cmap, range);
    }

    Ok(canvas.finish_svg())
}

fn draw_colorbar(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &HeatmapArtifact,
    config: &VizConfig,
    cmap: color::Colormap,
    range: Option<(f64, f64)>,
) {
    let cb_x = area.right() + COLORBAR_GAP;
    let step_h = area.height / COLORBAR_STEPS as f64;
    for k in 0..COLORBAR_STEPS {
        let t = 1.0 - (k as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y = area.top + k as f64 * step_h;
        canvas.rect(cb_x, y, COLORBAR_W, step_h + 0.5, &Style::fill(cmap(t)));
    }
    canvas.frame(cb_x, area.top, COLORBAR_W, area.height, &LineStyle::black(0.5));

    let cb_tick_style = TextStyle::new(config.font.tick_size * 0.9).baseline(Baseline::Central);
    if let Some((vmin, vmax)) = range {
        let n_ticks = 5;
        for k in 0..n_ticks {
            let f = k as f64 / (n_ticks - 1) as f64;
            let y = area.bottom() - f * area.height;
            let v = vmin + f * (vmax - vmin);
            canvas.line(cb_x + COLORBAR_W, y, cb_x + COLORBAR_W + 3.0, y, &LineStyle::black(0.5));
            canvas.text(cb_x + COLORBAR_W + 5.0, y, &format!("{v:.2}"), &cb_tick_style);
        }
    }

    if !artifact.colorbar_label.is_empty() {
        let label_style = TextStyle::new(config.font.label_size).anchor(Anchor::Middle);
        let x = cb_x
            + COLORBAR_W
            + 8.0
            + config.font.tick_size * 3.5
            + config.font.label_size * 0.5;
        canvas.text_rotated(x, area.center_y(), &artifact.colorbar_label, &label_style, 90.0);
    }
}
