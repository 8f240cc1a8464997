use super::*;

#[test]
fn decodes_png_bytes() {
    let src = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    src.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .unwrap();

    let img = decode_image(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (3, 2));
    assert_eq!(img.pixel_rgba(2, 1), Some([10, 20, 30, 255]));
}

#[test]
fn garbage_bytes_fail_with_context() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}
