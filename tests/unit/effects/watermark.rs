use super::*;
use crate::foundation::core::Rgba8;

fn spec() -> WatermarkSpec {
    WatermarkSpec {
        brand: "AB".to_owned(),
        font_size: 24.0,
        color: Rgba8::new(0, 0, 0, 64),
        rotation_degrees: 30.0,
        edge_padding: 4,
        ..WatermarkSpec::default()
    }
}

fn white(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]))
}

#[test]
fn rotated_bounds_swap_axes_at_right_angles() {
    let (w, h) = rotated_bounds(10.0, 2.0, std::f64::consts::FRAC_PI_2);
    assert!((w - 2.0).abs() < 1e-9 && (h - 10.0).abs() < 1e-9);
    let (w, h) = rotated_bounds(10.0, 2.0, 0.0);
    assert!((w - 10.0).abs() < 1e-9 && (h - 2.0).abs() < 1e-9);
}

#[test]
fn layer_covers_both_rotated_and_unrotated_text_plus_edges() {
    assert_eq!(layer_size(36.0, 24.0, 0.0, 4), (44, 32));
    let radians = 30f64.to_radians();
    let (w, h) = layer_size(36.0, 24.0, radians, 4);
    let (rw, rh) = rotated_bounds(36.0, 24.0, radians);
    assert!(f64::from(w) >= rw + 8.0 && f64::from(h) >= rh + 8.0);
    assert_eq!((w, h), (52, 47));
}

#[test]
fn placements_are_centered_on_anchor_fractions() {
    let p = plan_placements(&spec(), 100, 50, 200, 800);
    assert_eq!(
        p,
        vec![
            WatermarkPlacement {
                anchor: 0.25,
                rect: PixelRect::new(50, 175, 100, 50)
            },
            WatermarkPlacement {
                anchor: 0.75,
                rect: PixelRect::new(50, 575, 100, 50)
            },
        ]
    );
}

#[test]
fn short_posters_are_not_watermarked() {
    assert!(plan_placements(&spec(), 10, 10, 200, 399).is_empty());
}

#[test]
fn placements_that_would_clip_are_skipped() {
    let spec = spec();
    assert_eq!(min_height_for(&spec, 300), 600);
    assert_eq!(min_height_for(&spec, 10), 400);
    assert!(plan_placements(&spec, 100, 300, 200, 500).is_empty());
    assert_eq!(plan_placements(&spec, 100, 300, 200, 600).len(), 2);
}

#[test]
fn placements_stay_inside_the_poster_for_any_height_above_threshold() {
    let spec = spec();
    for height in (400..3000).step_by(37) {
        for p in plan_placements(&spec, 180, 120, 200, height) {
            assert!(p.rect.fits_within(200, height), "{p:?} at height {height}");
        }
    }
}

#[test]
fn watermark_is_composited_at_both_anchors() {
    let spec = spec();
    let glyph = GlyphSource::builtin(spec.font_size);
    let mut ts = Typesetter::for_source(&glyph);
    let mut poster = white(300, 500);

    let placements = apply_watermark(&mut poster, &mut ts, &glyph, &spec).unwrap();
    assert_eq!(placements.len(), 2);
    for p in &placements {
        assert!(p.rect.fits_within(300, 500));
        let r = p.rect;
        let touched = (r.x..r.x + r.width)
            .any(|x| (r.y..r.y + r.height).any(|y| poster.get_pixel(x, y).0 != [255, 255, 255, 255]));
        assert!(touched, "no ink in {r:?}");
    }
    assert_eq!(poster.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(poster.get_pixel(299, 499).0, [255, 255, 255, 255]);
    assert!(poster.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn translucent_ink_never_fully_covers_content() {
    let spec = spec();
    let glyph = GlyphSource::builtin(spec.font_size);
    let mut ts = Typesetter::for_source(&glyph);
    let mut poster = white(300, 500);
    apply_watermark(&mut poster, &mut ts, &glyph, &spec).unwrap();
    assert!(poster.pixels().all(|p| p.0[0] > 128));
}

#[test]
fn oversized_brand_shrinks_to_the_poster_width() {
    let spec = WatermarkSpec {
        brand: "LISTING POSTER".to_owned(),
        font_size: 96.0,
        ..WatermarkSpec::default()
    };
    let glyph = GlyphSource::builtin(spec.font_size);
    let mut ts = Typesetter::for_source(&glyph);
    let mut poster = white(100, 2000);
    let placements = apply_watermark(&mut poster, &mut ts, &glyph, &spec).unwrap();
    assert!(!placements.is_empty());
    assert!(placements.iter().all(|p| p.rect.fits_within(100, 2000)));
}

#[test]
fn disabled_or_short_posters_are_left_alone() {
    let glyph = GlyphSource::builtin(24.0);
    let mut ts = Typesetter::for_source(&glyph);

    let disabled = WatermarkSpec {
        enabled: false,
        ..spec()
    };
    let mut poster = white(300, 500);
    assert!(apply_watermark(&mut poster, &mut ts, &glyph, &disabled).unwrap().is_empty());
    assert_eq!(poster, white(300, 500));

    let mut short = white(300, 200);
    assert!(apply_watermark(&mut short, &mut ts, &glyph, &spec()).unwrap().is_empty());
    assert_eq!(short, white(300, 200));
}

#[test]
fn short_posters_above_threshold_shrink_until_every_anchor_fits() {
    let spec = WatermarkSpec::default();
    let glyph = GlyphSource::builtin(spec.font_size);
    let mut ts = Typesetter::for_source(&glyph);

    // At full size the layer needs an ~816 px poster to clear the 0.25 anchor.
    let full = render_layer(&mut ts, &glyph, &spec).unwrap();
    assert!(min_height_for(&spec, full.layer.height) > 676);

    let mut poster = white(1080, 676);
    let placements = apply_watermark(&mut poster, &mut ts, &glyph, &spec).unwrap();
    assert_eq!(placements.len(), 2);
    for p in &placements {
        assert!(p.rect.fits_within(1080, 676), "{p:?}");
        assert!(p.rect.height < full.layer.height);
    }
}

#[test]
fn shrink_factor_is_none_when_the_layer_already_fits() {
    let spec = spec();
    let layer = PremulLayer::new(50, 40, vec![0; 50 * 40 * 4]).unwrap();
    assert_eq!(shrink_factor(&spec, &layer, 300, 500), None);
    let by_height = shrink_factor(&spec, &layer, 300, 100).unwrap();
    assert!(by_height < 1.0);
}
