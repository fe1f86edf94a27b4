//! PDF export of a rendered SVG figure.
//!
//! plotters draws vectors only as SVG, so the PDF is produced by re-parsing
//! that SVG with `usvg` and converting the tree with `svg2pdf`. Text is
//! resolved against the system font database.
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use svg2pdf::usvg::{self, fontdb};

fn load_fonts(db: &mut fontdb::Database) {
    db.load_system_fonts();

    // plotters writes `font-family="sans-serif"`; map it to any installed face
    // when the database's default sans-serif family is missing.
    let sans = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    if db.query(&sans).is_none() {
        let fallback = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
        if let Some(family) = fallback {
            log::debug!("No default sans-serif font, using '{}' for PDF text", family);
            db.set_sans_serif_family(family);
        }
    }
}

/// Convert SVG markup into PDF bytes.
pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    load_fonts(options.fontdb_mut());
    let tree = usvg::Tree::from_str(svg, &options).context("Failed to parse SVG figure")?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| anyhow!("Failed to convert figure to PDF: {}", e))
}

/// Convert the SVG file at `svg_path` and write the PDF to `pdf_path`.
pub fn write_pdf_from_svg(svg_path: &Path, pdf_path: &Path) -> Result<()> {
    let svg = fs::read_to_string(svg_path)
        .with_context(|| format!("Failed to read SVG figure: {}", svg_path.display()))?;
    let pdf = svg_to_pdf(&svg)?;
    fs::write(pdf_path, pdf)
        .with_context(|| format!("Failed to write PDF figure: {}", pdf_path.display()))
}
