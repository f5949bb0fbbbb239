use super::*;

#[test]
fn encodes_an_rgb_png_with_the_poster_size() {
    let mut poster = RgbaImage::from_pixel(7, 5, image::Rgba([255, 255, 255, 255]));
    poster.put_pixel(3, 2, image::Rgba([10, 20, 30, 255]));

    let bytes = encode_png(&poster).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    let rgb = decoded.to_rgb8();
    assert_eq!(rgb.dimensions(), (7, 5));
    assert_eq!(rgb.get_pixel(3, 2).0, [10, 20, 30]);
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
}
