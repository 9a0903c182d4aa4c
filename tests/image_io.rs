#![cfg(feature = "image-io")]

use std::fs;
use texsearch::io::{load_gray_image, ImageDecoder};
use texsearch::{
    DescriptorKind, GrayDecoder, Metric, RetrievalEngine, SignatureStore, StoreConfig,
    TexSearchError,
};

fn gradient(width: u32, height: u32, step: u32) -> image::GrayImage {
    image::GrayImage::from_fn(width, height, |x, y| image::Luma([((x * step + y) % 256) as u8]))
}

#[test]
fn png_decodes_to_gray_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grad.png");
    gradient(8, 4, 16).save(&path).unwrap();

    let img = load_gray_image(&path).unwrap();
    assert_eq!((img.width(), img.height()), (8, 4));
    assert_eq!(img.get(3, 1), Some(49));

    let bytes = fs::read(&path).unwrap();
    let from_bytes = ImageDecoder.decode_bytes(&bytes).unwrap();
    assert_eq!(from_bytes, img);
}

#[test]
fn missing_and_corrupt_files_map_to_typed_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.png");
    assert!(matches!(
        load_gray_image(&missing),
        Err(TexSearchError::NotFound { .. })
    ));

    let corrupt = dir.path().join("corrupt.png");
    fs::write(&corrupt, b"\x89PNG not really").unwrap();
    assert!(matches!(
        load_gray_image(&corrupt),
        Err(TexSearchError::ImageDecode { .. })
    ));
}

#[test]
fn query_by_example_finds_the_same_image() {
    let dir = tempfile::tempdir().unwrap();
    for (name, step) in [("a.png", 1), ("b.png", 7), ("c.png", 31)] {
        gradient(32, 32, step).save(dir.path().join(name)).unwrap();
    }
    fs::write(dir.path().join("corrupt.png"), b"nope").unwrap();

    let store = SignatureStore::build(dir.path(), &ImageDecoder, &StoreConfig::default()).unwrap();
    assert_eq!(store.len(), 3);

    let query_img = load_gray_image(dir.path().join("b.png")).unwrap();
    let signature = DescriptorKind::Glcm.extract(&query_img).unwrap();
    let best = RetrievalEngine::new(&store).best_matches(&signature).unwrap();
    for metric in Metric::ALL {
        assert!(best[&metric].path.ends_with("b.png"), "{metric}");
        assert_eq!(best[&metric].distance, 0.0);
    }
}
