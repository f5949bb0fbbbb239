use super::*;

#[test]
fn premul_scales_color_by_alpha() {
    assert_eq!(Rgba8::new(255, 128, 0, 255).to_premul(), [255, 128, 0, 255]);
    assert_eq!(Rgba8::new(200, 100, 50, 0).to_premul(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::new(255, 255, 255, 128).to_premul(), [128, 128, 128, 128]);
}

#[test]
fn rgba_roundtrips_through_array_form() {
    let c: Rgba8 = serde_json::from_str("[1, 2, 3, 4]").unwrap();
    assert_eq!(c, Rgba8::new(1, 2, 3, 4));
    assert_eq!(serde_json::to_string(&c).unwrap(), "[1,2,3,4]");
}

#[test]
fn pixel_rect_overlap_is_exclusive_at_edges() {
    let a = PixelRect::new(0, 0, 10, 10);
    let b = PixelRect::new(10, 0, 10, 10);
    let c = PixelRect::new(9, 9, 2, 2);
    assert!(!a.overlaps(b));
    assert!(a.overlaps(c));
    assert!(b.overlaps(c));
}

#[test]
fn pixel_rect_fits_within_canvas() {
    let r = PixelRect::new(20, 30, 100, 50);
    assert!(r.fits_within(120, 80));
    assert!(!r.fits_within(119, 80));
    assert!(!r.fits_within(120, 79));
}
