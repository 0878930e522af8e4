pub mod canvas;
pub mod color;
pub mod config;
#[cfg(any(feature = "png", feature = "pdf"))]
pub mod font;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::{Path, PathBuf};

use config::VizConfig;
use hh_scan::HeatmapArtifact;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("invalid artifact: {0}")]
    Artifact(#[from] hh_core::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("font error: {0}")]
    Font(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a heatmap artifact to an SVG string.
pub fn render_svg(artifact: &HeatmapArtifact, config: &VizConfig) -> Result<String> {
    artifact.validate()?;
    plots::heatmap::render(artifact, config)
}

/// Render an artifact JSON of the given kind to an SVG string.
pub fn render_svg_json(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    match kind {
        "heatmap" | "fom_heatmap" => {
            let art: HeatmapArtifact = serde_json::from_str(artifact_json)?;
            render_svg(&art, config)
        }
        other => Err(RenderError::UnknownKind(other.to_string())),
    }
}

/// Convert a rendered SVG to bytes in the specified format.
pub fn svg_to_bytes(svg: String, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi, &config.font),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(&svg, &config.font),
        other => {
            let _ = config;
            Err(RenderError::UnknownKind(format!("format: {other}")))
        }
    }
}

/// Write `<dir>/<name>.<fmt>` for every format in `config.output.formats`.
///
/// The SVG is rendered once and converted per format. `dir` must exist.
pub fn save_heatmap(
    artifact: &HeatmapArtifact,
    dir: &Path,
    name: &str,
    config: &VizConfig,
) -> Result<Vec<PathBuf>> {
    let svg = render_svg(artifact, config)?;
    let mut written = Vec::with_capacity(config.output.formats.len());
    for format in &config.output.formats {
        let format = format.to_ascii_lowercase();
        let path = dir.join(format!("{name}.{format}"));
        let bytes = svg_to_bytes(svg.clone(), &format, config)?;
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), "wrote plot");
        written.push(path);
    }
    Ok(written)
}
