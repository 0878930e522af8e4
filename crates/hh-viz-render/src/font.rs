use usvg::fontdb::{Database, Family, Query};

use crate::RenderError;
use crate::config::FontConfig;

/// usvg options with system fonts plus any configured font files.
///
/// When no face answers the generic `sans-serif` family, the first loaded
/// family is promoted so that labels still rasterize.
pub fn usvg_options(font: &FontConfig) -> crate::Result<usvg::Options<'static>> {
    let mut opt = usvg::Options::default();
    let fontdb = opt.fontdb_mut();
    fontdb.load_system_fonts();
    for path in &font.files {
        fontdb
            .load_font_file(path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
    }
    ensure_sans_serif(fontdb);
    Ok(opt)
}

fn ensure_sans_serif(fontdb: &mut Database) {
    let query = Query { families: &[Family::SansSerif], ..Query::default() };
    if fontdb.query(&query).is_some() {
        return;
    }
    let fallback =
        fontdb.faces().find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    match fallback {
        Some(name) => {
            tracing::debug!(family = %name, "using fallback sans-serif family");
            fontdb.set_sans_serif_family(name);
        }
        None => tracing::warn!("no fonts available; text will be missing from PNG/PDF output"),
    }
}
