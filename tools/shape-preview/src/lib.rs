// Shape preview library: JSON shape lists in, BMP images out.

use std::fs::File;
use std::io::{self, BufWriter, Write as IoWrite};
use std::path::{Path, PathBuf};

use regular_shape::{Bitmap, RegularShape, RegularShapeOptions, StyleImage};
use serde::Deserialize;

// ============================================================================
// Input
// ============================================================================

/// One named shape in a preview file.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewEntry {
    pub name: String,
    #[serde(flatten)]
    pub options: RegularShapeOptions,
}

/// Parse a JSON array of preview entries.
pub fn parse_entries(json: &str) -> serde_json::Result<Vec<PreviewEntry>> {
    serde_json::from_str(json)
}

// ============================================================================
// Output
// ============================================================================

/// Images written for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub image: PathBuf,
    pub hit_detection: Option<PathBuf>,
}

/// Render `entry` and write `<name>.bmp` into `dir`, plus `<name>_hit.bmp`
/// when the hit-detection image differs from the visible one.
pub fn render_entry(entry: &PreviewEntry, dir: &Path) -> io::Result<Written> {
    check_name(&entry.name)?;
    let shape = RegularShape::new(entry.options.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}: {e}", entry.name)))?;

    let image = dir.join(format!("{}.bmp", entry.name));
    save_bmp(&image, shape.image())?;
    log::info!(
        "{}: {}x{} anchored at {:?}",
        entry.name,
        shape.size()[0],
        shape.size()[1],
        shape.anchor()
    );

    let hit_detection = if shape.rendered().shares_hit_detection_image() {
        None
    } else {
        let path = dir.join(format!("{}_hit.bmp", entry.name));
        save_bmp(&path, shape.hit_detection_image())?;
        Some(path)
    };
    Ok(Written {
        image,
        hit_detection,
    })
}

/// Entry names must be plain file names: not empty, `.` or `..`, and
/// without path separators.
fn check_name(name: &str) -> io::Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if bad {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid shape name {name:?}"),
        ));
    }
    Ok(())
}

/// Encode a bitmap as a 32-bit top-down BMP.
pub fn encode_bmp(bitmap: &Bitmap) -> Vec<u8> {
    let w = bitmap.width();
    let h = bitmap.height();
    let row_size = w * 4;
    let image_size = row_size * h;
    let file_size = 14 + 40 + image_size;

    let mut out = Vec::with_capacity(file_size as usize);

    // BMP file header (14 bytes)
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(14u32 + 40).to_le_bytes()); // pixel data offset

    // BITMAPINFOHEADER (40 bytes)
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&(-(h as i32)).to_le_bytes()); // negative height = top-down
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&[0u8; 8]); // pixels per meter
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors

    // RGBA -> BGRA
    for px in bitmap.data().chunks_exact(4) {
        out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    out
}

pub fn save_bmp(path: &Path, bitmap: &Bitmap) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    f.write_all(&encode_bmp(bitmap))?;
    f.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regular_shape::Points;

    #[test]
    fn test_bmp_header_and_pixels() {
        let bmp = Bitmap::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let bytes = encode_bmp(&bmp);
        assert_eq!(&bytes[..2], b"BM");
        assert_eq!(bytes.len(), 54 + 8);
        assert_eq!(u32::from_le_bytes(bytes[2..6].try_into().unwrap()), 62);
        assert_eq!(i32::from_le_bytes(bytes[22..26].try_into().unwrap()), -1);
        assert_eq!(&bytes[54..], &[3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_parse_entries() {
        let json = r##"[
            {"name": "dot", "points": "circle", "radius": 4, "fill": {"color": "#f00"}},
            {"name": "star", "points": {"regular": 5}, "radius": 10, "radius2": 4,
             "stroke": {"color": "navy", "width": 2, "line_join": "miter"}}
        ]"##;
        let entries = parse_entries(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].options.points, Points::Circle);
        assert_eq!(entries[1].options.points, Points::Regular(5));
        assert_eq!(entries[1].options.radius2, Some(4.0));
        let shape = RegularShape::new(entries[1].options.clone()).unwrap();
        assert_eq!(shape.size(), [25, 25]);
    }

    #[test]
    fn test_names_stay_inside_output_dir() {
        let dir = std::env::temp_dir().join("shape-preview-names");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["../escape", "a/b", "a\\b", "..", ""] {
            let entry = PreviewEntry {
                name: name.to_string(),
                options: RegularShapeOptions {
                    radius: Some(3.0),
                    ..Default::default()
                },
            };
            let err = render_entry(&entry, &dir).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{name:?}");
        }
        assert!(!dir.parent().unwrap().join("escape.bmp").exists());

        let entry = PreviewEntry {
            name: "dot".to_string(),
            options: RegularShapeOptions {
                radius: Some(3.0),
                ..Default::default()
            },
        };
        let written = render_entry(&entry, &dir).unwrap();
        assert_eq!(written.image, dir.join("dot.bmp"));
        assert!(written.image.exists());
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let json = r#"[{"name": "x", "radius": 3, "fill": {"color": "nope"}}]"#;
        assert!(parse_entries(json).is_err());
    }
}
