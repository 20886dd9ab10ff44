use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{QrStyleError, QrStyleResult};

/// Font database and resolved primary family for caption rendering.
pub struct CaptionFonts {
    /// System faces plus the user font, if one loaded.
    pub db: Arc<usvg::fontdb::Database>,
    /// Primary family of the user font; `None` falls back to sans-serif.
    pub family: Option<String>,
}

/// Load a font file into the database and return its primary family name.
pub fn load_font(db: &mut usvg::fontdb::Database, path: &Path) -> QrStyleResult<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        QrStyleError::font_resource(format!("read font '{}': {e}", path.display()))
    })?;
    let before = db.faces().count();
    db.load_font_data(bytes);
    db.faces()
        .skip(before)
        .find_map(|f| f.families.first().map(|(name, _)| name.clone()))
        .ok_or_else(|| {
            QrStyleError::font_resource(format!("no usable face in '{}'", path.display()))
        })
}

/// Build the caption font set: system fonts plus the optional user font.
///
/// A missing or unusable font file is a recovered condition: it is logged and
/// the caption renders with the generic sans-serif family instead. The error
/// never reaches the pipeline caller.
pub fn caption_font_db(font_path: Option<&Path>) -> CaptionFonts {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let family = match font_path {
        None => None,
        Some(path) => match load_font(&mut db, path) {
            Ok(family) => Some(family),
            Err(e) => {
                tracing::warn!(error = %e, "caption font unavailable; using sans-serif fallback");
                None
            }
        },
    };

    CaptionFonts {
        db: Arc::new(db),
        family,
    }
}

/// Font resolver for generated caption SVGs.
///
/// Generated captions only use normal style and stretch, so the query is that
/// simple; the last resort takes any available face rather than dropping the
/// caption glyphs.
pub(crate) fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(query_family(family));
            }
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);
            families.push(usvg::fontdb::Family::Monospace);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

fn query_family(family: &usvg::FontFamily) -> usvg::fontdb::Family<'_> {
    match family {
        usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
        usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
        usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
        usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
        usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
        usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
    }
}
