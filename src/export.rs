use std::path::Path;
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use tracing::debug;

use crate::error::{Error, Result};

const LOCAL_FONTS: &str = "fonts";

/// Generic families mapped onto whatever faces are installed.
#[derive(Debug, Default, PartialEq)]
struct Fallbacks {
    sans: Option<String>,
    serif: Option<String>,
}

fn pick_fallbacks<'a>(families: impl IntoIterator<Item = &'a str>) -> Fallbacks {
    let mut sans_family: Option<&str> = None;
    let mut serif_family: Option<&str> = None;
    let mut first_family: Option<&str> = None;

    for family in families {
        if first_family.is_none() {
            first_family = Some(family);
        }
        let lower = family.to_ascii_lowercase();
        if sans_family.is_none() && lower.contains("sans") {
            sans_family = Some(family);
        } else if serif_family.is_none() && lower.contains("serif") {
            serif_family = Some(family);
        }
    }

    Fallbacks {
        sans: sans_family.or(first_family).map(str::to_string),
        serif: serif_family.or(sans_family).or(first_family).map(str::to_string),
    }
}

fn configure_font_fallbacks(fontdb: &mut usvg::fontdb::Database) {
    let fallbacks = pick_fallbacks(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = &fallbacks.sans {
        fontdb.set_sans_serif_family(family.as_str());
    }
    if let Some(family) = &fallbacks.serif {
        fontdb.set_serif_family(family.as_str());
    }
    debug!(?fallbacks, "raster font fallbacks");
}

fn configure_font_fallbacks_svg2pdf(fontdb: &mut svg2pdf::usvg::fontdb::Database) {
    let fallbacks = pick_fallbacks(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = &fallbacks.sans {
        fontdb.set_sans_serif_family(family.as_str());
    }
    if let Some(family) = &fallbacks.serif {
        fontdb.set_serif_family(family.as_str());
    }
    debug!(?fallbacks, "pdf font fallbacks");
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidScale(scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new(LOCAL_FONTS);
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        configure_font_fallbacks(fontdb);
    }

    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| Error::Raster(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::Raster(format!("cannot allocate a {width}x{height} pixmap")))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| Error::Raster(e.to_string()))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut fontdb = svg2pdf::usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new(LOCAL_FONTS);
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    configure_font_fallbacks_svg2pdf(&mut fontdb);

    let opts = svg2pdf::usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts).map_err(|e| Error::Pdf(e.to_string()))?;

    // Outline text so viewers without the map font still show names.
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };
    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| Error::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{Fallbacks, pick_fallbacks, svg_to_png};
    use crate::error::Error;

    #[test]
    fn fallbacks_prefer_named_families() {
        let picked = pick_fallbacks(["Courier", "DejaVu Serif", "Noto Sans"]);
        assert_eq!(
            picked,
            Fallbacks {
                sans: Some("Noto Sans".to_string()),
                serif: Some("DejaVu Serif".to_string()),
            }
        );
    }

    #[test]
    fn fallbacks_use_first_face_when_nothing_matches() {
        let picked = pick_fallbacks(["Courier"]);
        assert_eq!(picked.sans.as_deref(), Some("Courier"));
        assert_eq!(picked.serif.as_deref(), Some("Courier"));
        assert_eq!(pick_fallbacks(Vec::<&str>::new()), Fallbacks::default());
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(matches!(
            svg_to_png("<svg/>", 0.0),
            Err(Error::InvalidScale(_))
        ));
        assert!(matches!(
            svg_to_png("<svg/>", f32::NAN),
            Err(Error::InvalidScale(_))
        ));
    }
}
