use super::*;

fn write_png(path: &Path, w: u32, h: u32, alpha: bool) {
    if alpha {
        image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 128]))
            .save(path)
            .unwrap();
    } else {
        image::RgbImage::from_pixel(w, h, image::Rgb([10, 20, 30]))
            .save(path)
            .unwrap();
    }
}

#[test]
fn opaque_images_become_shrunk_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swatch.png");
    write_png(&path, 40, 20, false);

    let bytes = ThumbnailCodec::default().encode(&path, 10).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (10, 5));
}

#[test]
fn transparent_images_stay_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.png");
    write_png(&path, 8, 8, true);

    let bytes = ThumbnailCodec::default()
        .encode(&path, DEFAULT_IMAGE_MAX_DIM)
        .unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 8));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(
        ThumbnailCodec::default()
            .encode(&dir.path().join("nope.png"), 100)
            .is_err()
    );
}
