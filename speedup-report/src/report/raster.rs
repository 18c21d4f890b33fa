//! SVG rasterization and PNG encoding
//!
//! The chart is rendered with resvg at the requested pixel size. Text needs a
//! sans-serif face; when none of the usual families is installed, labels are
//! left out of the raster rather than failing the render.

use super::RenderError;
use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sans-serif families tried in order when resolving the generic family
const SANS_SERIF_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Noto Sans",
    "FreeSans",
];

/// Rasterize an SVG document to exactly `size` pixels
pub fn rasterize(svg: &str, size: (u32, u32), font_dirs: &[PathBuf]) -> Result<RgbaImage, RenderError> {
    let (width, height) = size;

    let mut options = Options::default();
    options.fontdb = Arc::new(font_database(font_dirs));

    let tree = Tree::from_str(svg, &options).map_err(|e| RenderError::Rasterize(e.to_string()))?;
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;

    let tree_size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / tree_size.width(),
        height as f32 / tree_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    log::debug!("Rasterized chart at {}x{} pixels", width, height);

    let pixels: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(width, height, pixels).ok_or(RenderError::Canvas { width, height })
}

/// Encode `image` as PNG at `path`
///
/// A failure part way through can leave a truncated file behind.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(source) => RenderError::Write {
                path: path.to_path_buf(),
                source,
            },
            other => RenderError::Encode {
                path: path.to_path_buf(),
                source: other,
            },
        })
}

fn font_database(font_dirs: &[PathBuf]) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    for dir in font_dirs {
        log::debug!("Loading fonts from {:?}", dir);
        db.load_fonts_dir(dir);
    }

    let available = SANS_SERIF_FAMILIES.into_iter().find(|family| {
        db.faces()
            .any(|face| face.families.iter().any(|(name, _)| name.as_str() == *family))
    });
    match available {
        Some(family) => {
            log::debug!("Using '{}' for sans-serif text", family);
            db.set_sans_serif_family(family);
        }
        None if db.len() == 0 => log::warn!("No fonts found; chart text will be missing"),
        None => log::warn!("No common sans-serif font found; chart text may be missing"),
    }
    db
}
