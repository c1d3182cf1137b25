//! ZIP archives of exported scenes.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::ExportError;

/// Image extensions stripped from titles before they become file names.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// One PNG destined for an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub png: Vec<u8>,
}

/// Turn a scene title into a safe file-name stem.
///
/// Letters, digits, `-`, `_` and `.` are kept; everything else becomes `_`.
/// A trailing image extension is dropped, and an empty result falls back to
/// `scene`.
pub fn sanitize_title(title: &str) -> String {
    let trimmed = title.trim();
    let stem = match trimmed.rsplit_once('.') {
        Some((stem, ext))
            if IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => trimmed,
    };

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '_' || c == '.') {
        "scene".to_string()
    } else {
        sanitized
    }
}

/// Archive entry name for the scene at 1-based position `index`.
pub fn entry_name(index: usize, title: &str) -> String {
    format!("{:02}_{}.png", index, sanitize_title(title))
}

/// Pack PNGs into an in-memory ZIP archive, in order.
pub fn write_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in entries {
        log::trace!("Adding '{}' ({} bytes) to archive", entry.name, entry.png.len());
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.png)?;
    }

    let bytes = writer.finish()?.into_inner();
    log::debug!(
        "Wrote archive with {} entries ({} bytes)",
        entries.len(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Image 1"), "Image_1");
        assert_eq!(sanitize_title("bug report.png"), "bug_report");
        assert_eq!(sanitize_title("Screen.Shot.JPEG"), "Screen.Shot");
        assert_eq!(sanitize_title("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_title("notes.txt"), "notes.txt");
        assert_eq!(sanitize_title("Скриншот"), "Скриншот");
    }

    #[test]
    fn test_sanitize_falls_back_to_scene() {
        assert_eq!(sanitize_title(""), "scene");
        assert_eq!(sanitize_title("   "), "scene");
        assert_eq!(sanitize_title("???"), "scene");
        assert_eq!(sanitize_title(".png"), "scene");
    }

    #[test]
    fn test_entry_names_are_numbered() {
        assert_eq!(entry_name(1, "Image 1"), "01_Image_1.png");
        assert_eq!(entry_name(12, "x"), "12_x.png");
        assert_eq!(entry_name(100, "x"), "100_x.png");
    }

    #[test]
    fn test_archive_preserves_order_and_content() {
        let entries = vec![
            ArchiveEntry {
                name: entry_name(1, "first"),
                png: vec![1, 2, 3],
            },
            ArchiveEntry {
                name: entry_name(2, "second"),
                png: vec![4, 5],
            },
        ];
        let bytes = write_archive(&entries).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        for (i, expected) in entries.iter().enumerate() {
            let mut file = archive.by_index(i).unwrap();
            assert_eq!(file.name(), expected.name);
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            assert_eq!(content, expected.png);
        }
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = write_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
