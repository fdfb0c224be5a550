//! PDF export end to end: snapshot, raster, encode, write.

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use lopdf::{Document, Object};
use pokedex::{
    export::{export_pdf, ExportJob, SNAPSHOT_COLS, SNAPSHOT_ROWS},
    raster::{CELL_HEIGHT, CELL_WIDTH},
    sprite::SpriteData,
    state::{DetailRecord, StatRow, StatTable},
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pokedex-export-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn job(dir: &PathBuf, sprite: Option<SpriteData>) -> ExportJob {
    ExportJob {
        record: DetailRecord {
            name: "charmander".into(),
            image_url: Some("https://img/4.png".into()),
            stats: vec![
                StatRow {
                    key: 0,
                    stat_name: "hp".into(),
                    base_value: 39,
                },
                StatRow {
                    key: 1,
                    stat_name: "attack".into(),
                    base_value: 52,
                },
                StatRow {
                    key: 2,
                    stat_name: "speed".into(),
                    base_value: 65,
                },
            ],
        },
        sprite,
        table: StatTable::default(),
        path: dir.join("charmander.pdf").to_string_lossy().into_owned(),
    }
}

fn number(object: &Object) -> f32 {
    match object {
        Object::Integer(value) => *value as f32,
        Object::Real(value) => *value as f32,
        other => panic!("not a number: {other:?}"),
    }
}

#[test]
fn export_writes_single_page_pdf() {
    let dir = scratch_dir("single");
    let path = export_pdf(&job(&dir, None)).unwrap();
    assert!(path.ends_with("charmander.pdf"));

    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn page_aspect_matches_embedded_image() {
    let dir = scratch_dir("aspect");
    let sprite = SpriteData::from_rgba(&RgbaImage::from_pixel(8, 8, Rgba([240, 128, 48, 255])));
    let path = export_pdf(&job(&dir, Some(sprite))).unwrap();
    let doc = Document::load(&path).unwrap();

    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let page_w = number(&media_box[2]);
    let page_h = number(&media_box[3]);

    let image = doc
        .objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .find(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|subtype| subtype.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false)
        })
        .unwrap();
    let image_w = image.dict.get(b"Width").unwrap().as_i64().unwrap() as f32;
    let image_h = image.dict.get(b"Height").unwrap().as_i64().unwrap() as f32;

    assert_eq!(image_w, (SNAPSHOT_COLS as u32 * CELL_WIDTH) as f32);
    assert_eq!(image_h, (SNAPSHOT_ROWS as u32 * CELL_HEIGHT) as f32);
    assert!((page_h / page_w - image_h / image_w).abs() < 1e-3);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unwritable_target_reports_write_error() {
    let dir = scratch_dir("blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let mut job = job(&dir, None);
    job.path = blocker
        .join("charmander.pdf")
        .to_string_lossy()
        .into_owned();
    let error = export_pdf(&job).unwrap_err();
    assert!(error.to_string().contains("could not write"));
    let _ = std::fs::remove_dir_all(&dir);
}
