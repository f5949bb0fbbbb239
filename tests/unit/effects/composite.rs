use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn translucent_src_over_opaque_dst_stays_opaque() {
    // 25% grey over white.
    let out = over([255, 255, 255, 255], [32, 32, 32, 64], 1.0);
    assert_eq!(out[3], 255);
    assert!(out[0] < 255 && out[0] > 180, "{out:?}");
}

#[test]
fn layer_rejects_wrong_buffer_size() {
    assert!(PremulLayer::new(2, 2, vec![0; 15]).is_err());
    assert!(PremulLayer::new(2, 2, vec![0; 16]).unwrap().is_empty());
}

#[test]
fn over_at_only_touches_the_layer_rect() {
    let mut dst = RgbaImage::from_pixel(6, 6, image::Rgba([255, 255, 255, 255]));
    let layer = PremulLayer::new(2, 2, [0u8, 0, 0, 255].repeat(4)).unwrap();
    over_at(&mut dst, &layer, 3, 1).unwrap();
    assert_eq!(dst.get_pixel(3, 1).0, [0, 0, 0, 255]);
    assert_eq!(dst.get_pixel(4, 2).0, [0, 0, 0, 255]);
    assert_eq!(dst.get_pixel(2, 1).0, [255, 255, 255, 255]);
    assert_eq!(dst.get_pixel(3, 3).0, [255, 255, 255, 255]);
}

#[test]
fn over_at_rejects_out_of_bounds_layers() {
    let mut dst = RgbaImage::new(4, 4);
    let layer = PremulLayer::new(2, 2, vec![0; 16]).unwrap();
    assert!(over_at(&mut dst, &layer, 3, 0).is_err());
    assert!(over_at(&mut dst, &layer, 2, 2).is_ok());
}
