use crate::RenderError;
use crate::config::FontConfig;
use crate::font::usvg_options;

/// Convert SVG string to PDF bytes (vector).
pub fn svg_to_pdf(svg: &str, font: &FontConfig) -> crate::Result<Vec<u8>> {
    let opt = usvg_options(font)?;
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Pdf(e.to_string()))?;

    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), svg2pdf::PageOptions::default())
        .map_err(|e| RenderError::Pdf(e.to_string()))
}
