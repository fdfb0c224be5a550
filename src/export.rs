//! Overlay snapshot to single-page PDF.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use serde::{Deserialize, Serialize};

use crate::components::stat_panels::{render_overlay_content, OverlayContent};
use crate::raster;
use crate::sprite::SpriteData;
use crate::state::{DetailRecord, StatTable};

/// Snapshot size in cells. The PDF layout does not follow the terminal size.
pub const SNAPSHOT_COLS: u16 = 60;
pub const SNAPSHOT_ROWS: u16 = 34;
/// A4 width in points.
pub const PAGE_WIDTH_PT: f32 = 595.28;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("snapshot failed: {0}")]
    Snapshot(#[source] std::io::Error),
    #[error("pdf encoding failed: {0}")]
    Encode(#[from] lopdf::Error),
    #[error("could not write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything needed to export one overlay, detached from the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub record: DetailRecord,
    pub sprite: Option<SpriteData>,
    pub table: StatTable,
    pub path: String,
}

pub fn export_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("{safe}.pdf")
}

pub fn export_path(dir: &str, name: &str) -> String {
    Path::new(dir)
        .join(export_file_name(name))
        .to_string_lossy()
        .into_owned()
}

pub fn export_pdf(job: &ExportJob) -> Result<PathBuf, ExportError> {
    let buffer = snapshot(job)?;
    let image = raster::rasterize(&buffer);
    let bytes = encode_pdf(&image, &job.record.name)?;

    let path = PathBuf::from(&job.path);
    let write_error = |source| ExportError::Write {
        path: job.path.clone(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(&path, bytes).map_err(write_error)?;
    Ok(path)
}

/// Renders the overlay content off-screen at a fixed cell size.
pub fn snapshot(job: &ExportJob) -> Result<Buffer, ExportError> {
    let backend = TestBackend::new(SNAPSHOT_COLS, SNAPSHOT_ROWS);
    let mut terminal = Terminal::new(backend).map_err(ExportError::Snapshot)?;
    terminal
        .draw(|frame| {
            let content = OverlayContent {
                record: &job.record,
                sprite: job.sprite.as_ref(),
                sprite_loading: false,
                table: &job.table,
            };
            let area = frame.area();
            render_overlay_content(frame, area, &content);
        })
        .map_err(ExportError::Snapshot)?;
    Ok(terminal.backend().buffer().clone())
}

/// Page size in points for a raster, keeping its aspect ratio.
pub fn page_size(width_px: u32, height_px: u32) -> (f32, f32) {
    if width_px == 0 {
        return (PAGE_WIDTH_PT, 0.0);
    }
    (
        PAGE_WIDTH_PT,
        PAGE_WIDTH_PT * height_px as f32 / width_px as f32,
    )
}

pub fn encode_pdf(image: &RgbImage, title: &str) -> Result<Vec<u8>, ExportError> {
    let (width_px, height_px) = image.dimensions();
    let (page_w, page_h) = page_size(width_px, height_px);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width_px as i64,
            "Height" => height_px as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_w.into(),
                    0.into(),
                    0.into(),
                    page_h.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
        "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Producer" => Object::string_literal("pokedex"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| ExportError::Encode(err.into()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_separators() {
        assert_eq!(export_file_name("mr-mime"), "mr-mime.pdf");
        assert_eq!(export_file_name("a/b"), "a_b.pdf");
    }

    #[test]
    fn page_keeps_raster_aspect() {
        let (w, h) = page_size(480, 544);
        assert_eq!(w, PAGE_WIDTH_PT);
        assert!((h / w - 544.0 / 480.0).abs() < 1e-4);
    }

    #[test]
    fn snapshot_has_fixed_size() {
        let job = ExportJob {
            record: DetailRecord {
                name: "pikachu".into(),
                image_url: None,
                stats: Vec::new(),
            },
            sprite: None,
            table: StatTable::default(),
            path: "pikachu.pdf".into(),
        };
        let buffer = snapshot(&job).unwrap();
        assert_eq!(buffer.area.width, SNAPSHOT_COLS);
        assert_eq!(buffer.area.height, SNAPSHOT_ROWS);
    }
}
