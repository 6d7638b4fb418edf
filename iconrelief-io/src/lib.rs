//! I/O operations for iconrelief
//!
//! This crate reads vector icons and turns them into flattened path data
//! that the extrusion pipeline consumes.

pub mod svg;

pub use svg::{FillRule, PathStyle, Subpath, SvgDocument, SvgLoadOptions, SvgLoader, SvgPath};

use iconrelief_core::{Error, Result};

/// Trait for reading vector documents from files
pub trait VectorReader {
    fn read_document<P: AsRef<std::path::Path>>(&self, path: P) -> Result<SvgDocument>;
}

impl VectorReader for SvgLoader {
    fn read_document<P: AsRef<std::path::Path>>(&self, path: P) -> Result<SvgDocument> {
        self.load(path)
    }
}

/// Auto-detect format and read a vector document
pub fn read_svg<P: AsRef<std::path::Path>>(path: P, options: SvgLoadOptions) -> Result<SvgDocument> {
    let path = path.as_ref();
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("svg") | Some("svgz") => SvgLoader::new(options).read_document(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported vector format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_svg_rejects_other_extensions() {
        let result = read_svg("icon.png", SvgLoadOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_read_svg_missing_file_is_io_error() {
        let result = read_svg("definitely-not-here.svg", SvgLoadOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_read_svg_from_disk() {
        let path = std::env::temp_dir().join("iconrelief_io_read_test.svg");
        std::fs::write(
            &path,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><circle cx="4" cy="4" r="3"/></svg>"#,
        )
        .unwrap();

        let doc = read_svg(&path, SvgLoadOptions::default()).unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert!(doc.paths[0].subpaths[0].points.len() > 8);

        let _ = std::fs::remove_file(&path);
    }
}
