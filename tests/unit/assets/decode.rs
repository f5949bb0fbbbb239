use std::io::Cursor;

use image::{ImageFormat, Rgb};

use super::*;

fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Left half red, right half blue.
fn split_image(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    })
}

#[test]
fn cover_scale_takes_the_larger_ratio() {
    assert_eq!(cover_scale(100, 100, 200, 50), 2.0);
    assert_eq!(cover_scale(400, 100, 100, 100), 1.0);
    assert_eq!(cover_scale(100, 400, 50, 50), 0.5);
}

#[test]
fn cells_are_exact_size_for_any_aspect() {
    for (sw, sh) in [(640, 480), (480, 640), (1000, 100), (100, 1000), (37, 53), (510, 380)] {
        let src = RgbImage::from_pixel(sw, sh, Rgb([10, 20, 30]));
        let cell = cover_fit(&src, 510, 380).unwrap();
        assert_eq!(cell.dimensions(), (510, 380), "source {sw}x{sh}");
    }
}

#[test]
fn wide_sources_are_center_cropped() {
    // 4:1 source into a square cell keeps the middle half, i.e. both colors meet at the center.
    let src = split_image(400, 100);
    let cell = cover_fit(&src, 100, 100).unwrap();
    assert_eq!(cell.get_pixel(5, 50).0, [255, 0, 0]);
    assert_eq!(cell.get_pixel(94, 50).0, [0, 0, 255]);
}

#[test]
fn render_cell_decodes_png_and_jpeg() {
    let src = RgbImage::from_pixel(64, 48, Rgb([0, 128, 0]));
    for format in [ImageFormat::Png, ImageFormat::Jpeg] {
        let cell = render_cell(&encode(&src, format), 30, 30).unwrap();
        assert_eq!(cell.dimensions(), (30, 30));
        let p = cell.get_pixel(15, 15).0;
        assert!(p[1] > 100 && p[0] < 30 && p[2] < 30, "{format:?}: {p:?}");
    }
}

#[test]
fn converts_rgba_sources_to_rgb() {
    let rgba = image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 4]));
    let mut buf = Cursor::new(Vec::new());
    rgba.write_to(&mut buf, ImageFormat::Png).unwrap();
    let rgb = decode_rgb(buf.get_ref()).unwrap();
    assert_eq!(rgb.get_pixel(0, 0).0, [1, 2, 3]);
}

#[test]
fn undecodable_bytes_are_an_error() {
    assert!(render_cell(b"not an image", 10, 10).is_err());
    assert!(render_cell(&[], 10, 10).is_err());
}

#[test]
fn window_maps_the_cell_back_onto_the_source() {
    assert_eq!(cover_window(400, 100, 100, 100), PixelRect::new(150, 0, 100, 100));
    assert_eq!(cover_window(640, 480, 320, 240), PixelRect::new(0, 0, 640, 480));
    // 1x600 into 520x380 scales by 520, so a single source pixel covers the cell.
    let w = cover_window(1, 600, 520, 380);
    assert_eq!((w.x, w.width), (0, 1));
    assert_eq!(w.height, 1);
    assert_eq!(w.y, 299);
}

#[test]
fn skinny_sources_resample_only_their_window() {
    let src = RgbImage::from_fn(1, 600, |_, y| {
        if y < 300 { Rgb([200, 0, 0]) } else { Rgb([0, 0, 200]) }
    });
    let cell = cover_fit(&src, 520, 380).unwrap();
    assert_eq!(cell.dimensions(), (520, 380));

    let wide = RgbImage::from_pixel(5000, 1, Rgb([0, 90, 0]));
    let cell = render_cell(&encode(&wide, ImageFormat::Png), 520, 380).unwrap();
    assert_eq!(cell.dimensions(), (520, 380));
    assert_eq!(cell.get_pixel(260, 190).0, [0, 90, 0]);
}
