//! `hhscan scan` pipeline: load → axes → aggregate → render → select.

use anyhow::Result;
use hh_scan::{
    HeatmapArtifact, Quantity, ScanAxes, ScanGrids, ScanSummary, aggregate, load_fom_arrays,
    select_optimum,
};
use std::path::PathBuf;

use crate::config::ScanSettings;

/// Base file name (no extension) of the map for one quantity.
pub fn plot_name(category: &str, mass_window: &str, quantity: Quantity) -> String {
    match quantity {
        Quantity::Fom => format!("fom_{category}_abcd_mass{mass_window}_map"),
        q => format!("{category}_{}_map", q.key()),
    }
}

pub fn run_scan(settings: &ScanSettings, write_plots: bool) -> Result<ScanSummary> {
    let records = load_fom_arrays(&settings.input)?;
    let axes = ScanAxes::build(&records, settings.bdt_bounds, settings.xbb_bounds)?;
    tracing::info!(n_bdt = axes.bdt.len(), n_xbb = axes.xbb.len(), "scan axes");
    let grids = aggregate(&records, axes, &settings.options)?;

    // Maps are written even when nothing qualifies; the error surfaces after.
    let selection = select_optimum(&grids);
    if write_plots {
        let highlight = selection.as_ref().map(|s| s.cells.clone()).unwrap_or_default();
        let written = render_maps(settings, &grids, &highlight)?;
        tracing::info!(files = written.len(), dir = %settings.plot_dir.display(), "maps written");
    }
    let selection = selection?;
    Ok(ScanSummary::new(&settings.category, &grids, &selection))
}

fn render_maps(
    settings: &ScanSettings,
    grids: &ScanGrids,
    highlight: &[(usize, usize)],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for &quantity in &settings.quantities {
        let name = plot_name(&settings.category, &settings.mass_window, quantity);
        let title = match quantity {
            Quantity::Fom => settings.category.clone(),
            q => format!("{}: {}", settings.category, q.label()),
        };
        let artifact = HeatmapArtifact::from_grids(grids, quantity, &title, highlight)?;
        written.extend(hh_viz_render::save_heatmap(
            &artifact,
            &settings.plot_dir,
            &name,
            &settings.viz,
        )?);

        if settings.show {
            let json_path = settings.plot_dir.join(format!("{name}.json"));
            std::fs::write(&json_path, serde_json::to_string_pretty(&artifact)?)?;
            let svg_path = settings.plot_dir.join(format!("{name}.svg"));
            let svg = hh_viz_render::render_svg(&artifact, &settings.viz)?;
            hh_viz_render::output::svg::save_svg(&svg, &svg_path)?;
            tracing::info!(json = %json_path.display(), svg = %svg_path.display(), "wrote preview");
            written.push(json_path);
            written.push(svg_path);
        }
    }
    Ok(written)
}
