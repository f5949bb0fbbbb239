use std::io::Cursor;

use super::*;
use crate::config::{CanvasConfig, FontConfig, GridConfig, TextConfig, WatermarkSpec};

fn small_config() -> PosterConfig {
    PosterConfig {
        grid: GridConfig {
            canvas_width: 400,
            cell_height: 100,
            gap: 10,
            max_images: 4,
        },
        text: TextConfig {
            font_size: 16.0,
            line_height: 24,
            margin_x: 12,
            top_margin: 8,
            bullet_indent: 24,
            bullet_size: 14,
            title: None,
            ..TextConfig::default()
        },
        canvas: CanvasConfig {
            working_height: 2000,
            bottom_margin: 16,
            ..CanvasConfig::default()
        },
        watermark: WatermarkSpec {
            font_size: 20.0,
            brand: "BRAND".to_owned(),
            min_canvas_height: 200,
            ..WatermarkSpec::default()
        },
        fonts: FontConfig::builtin_only(),
        ..PosterConfig::default()
    }
}

fn png(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn empty_requests_are_rejected_before_rendering() {
    let engine = PosterEngine::new(small_config()).unwrap();
    let err = engine
        .compose(&PosterRequest::new(Vec::new(), "text"))
        .unwrap_err();
    assert!(matches!(err, PosterError::InvalidRequest(_)), "{err}");

    let err = engine
        .compose(&PosterRequest::new(vec![png(4, 4, [1, 2, 3])], " \n "))
        .unwrap_err();
    assert!(matches!(err, PosterError::InvalidRequest(_)), "{err}");
}

#[test]
fn working_height_must_hold_the_full_grid() {
    let mut cfg = small_config();
    cfg.canvas.working_height = 250;
    assert!(matches!(
        PosterEngine::new(cfg),
        Err(PosterError::Validation(_))
    ));
}

#[test]
fn builtin_face_is_used_without_candidates() {
    let engine = PosterEngine::new(small_config()).unwrap();
    assert!(engine.face().is_builtin());
    assert_eq!(engine.grid().cell_width, 185);
}

#[test]
fn height_follows_content() {
    let engine = PosterEngine::new(small_config()).unwrap();
    let request = PosterRequest::new(
        vec![png(50, 30, [200, 0, 0]); 3],
        "√ Central location\n√ 2 bedrooms, £2000pcm",
    );
    let (poster, report) = engine.render(&request).unwrap();

    assert_eq!(report.grid_bottom, 2 * (100 + 10) + 10);
    assert_eq!(report.content_height, report.grid_bottom + 8 + 2 * 24);
    assert_eq!(poster.height(), report.content_height + 16);
    assert_eq!(poster.width(), 400);
    assert_eq!(report.lines.len(), 2);
    assert!(report.lines.iter().all(|l| l.is_bulleted));
    assert!(!report.text.truncated);
}

#[test]
fn cells_are_painted_and_the_spare_slot_stays_blank() {
    let engine = PosterEngine::new(small_config()).unwrap();
    let request = PosterRequest::new(vec![png(50, 30, [200, 0, 0]); 3], "hello");
    let (poster, report) = engine.render(&request).unwrap();

    assert_eq!(report.cells.len(), 3);
    let c0 = report.cells[0];
    assert_eq!(poster.get_pixel(c0.x + 5, c0.y + 5).0, [200, 0, 0, 255]);
    let c2 = report.cells[2];
    assert_eq!(poster.get_pixel(c2.x + 5, c2.y + 5).0, [200, 0, 0, 255]);
    // Row 1, column 1 has no image.
    let blank = engine.grid().cell_rect(3);
    assert_eq!(poster.get_pixel(blank.x + 5, blank.y + 5).0, [255, 255, 255, 255]);
}

#[test]
fn output_carries_png_and_file_name() {
    let engine = PosterEngine::new(small_config()).unwrap();
    let out = engine
        .compose(&PosterRequest::new(vec![png(8, 8, [0, 90, 0])], "One line"))
        .unwrap();
    assert_eq!(out.file_name, "listing-poster.png");
    let decoded = image::load_from_memory(&out.png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (out.width, out.height));
}

#[test]
fn the_face_must_cover_the_watermark_brand() {
    let Some(path) = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ]
    .into_iter()
    .map(std::path::PathBuf::from)
    .find(|p| p.is_file()) else {
        return;
    };
    let with_brand = |brand: &str| {
        let mut cfg = small_config();
        cfg.fonts = FontConfig {
            candidates: vec![crate::config::FontCandidate::File { path: path.clone() }],
            coverage_probe: "A".to_owned(),
            ..FontConfig::builtin_only()
        };
        cfg.watermark.brand = brand.to_owned();
        PosterEngine::new(cfg).unwrap()
    };

    assert!(!with_brand("BRAND").face().is_builtin());
    assert!(with_brand("房源海报").face().is_builtin());
}
